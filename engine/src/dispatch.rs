//! Generic dispatch: the open, author-extensible multimethod mechanism
//! that is the substrate for properties, activities, and verbs
//! (spec.md §4.1).
//!
//! A [`Generic`] operation is an ordered list of [`Method`]s. Calling it
//! scans from the tail toward the head; the first method whose guard
//! passes runs. A method can call the supplied [`Next`] continuation to
//! resume the scan just above itself, which is how decorator-like
//! layering (a more specific rule deferring to a more general one)
//! works. Order of registration is order of dispatch, and authors rely
//! on that being stable.
//!
//! Every method is handed two references: a `Ctx` (almost always the
//! [`crate::world::World`]) and the call's `Args`. Splitting context
//! from arguments (rather than bundling both into one borrowed struct)
//! sidesteps self-referential lifetime issues when a property's method
//! chain needs to read the very world it is stored inside of.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Error raised when a [`Generic`] operation's method chain is exhausted
/// without any guard passing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no applicable method for operation '{operation}'")]
pub struct NoApplicableMethod {
    pub operation: String,
}

/// The continuation passed to a method handler, letting it defer to the
/// next (earlier-registered) applicable method.
pub struct Next<'a, Ctx, Args, Out> {
    methods: &'a [Method<Ctx, Args, Out>],
    position: usize,
    operation: &'a str,
    ctx: &'a Ctx,
    args: &'a Args,
}

impl<'a, Ctx, Args, Out> Next<'a, Ctx, Args, Out> {
    /// Resumes the scan at the position just before the current method.
    pub fn call(&self) -> Result<Out, NoApplicableMethod> {
        dispatch_from(self.methods, self.position, self.operation, self.ctx, self.args)
    }

    /// True if resuming the scan would find another applicable method.
    pub fn has_next(&self) -> bool {
        self.methods[..self.position]
            .iter()
            .rev()
            .any(|m| (m.guard)(self.ctx, self.args))
    }
}

type Handler<Ctx, Args, Out> = Rc<dyn for<'a> Fn(&'a Ctx, &'a Args, Next<'a, Ctx, Args, Out>) -> Out>;
type Guard<Ctx, Args> = Rc<dyn Fn(&Ctx, &Args) -> bool>;

/// A single registered method: a name, an optional guard, and a handler.
#[derive(Clone)]
pub struct Method<Ctx, Args, Out> {
    name: String,
    guard: Guard<Ctx, Args>,
    handler: Handler<Ctx, Args, Out>,
}

impl<Ctx, Args, Out> fmt::Debug for Method<Ctx, Args, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("name", &self.name).finish()
    }
}

fn dispatch_from<Ctx, Args, Out>(
    methods: &[Method<Ctx, Args, Out>],
    from: usize,
    operation: &str,
    ctx: &Ctx,
    args: &Args,
) -> Result<Out, NoApplicableMethod> {
    for idx in (0..from).rev() {
        let method = &methods[idx];
        if (method.guard)(ctx, args) {
            tracing::trace!(operation, method = %method.name, idx, "dispatch: method applies");
            let next = Next {
                methods,
                position: idx,
                operation,
                ctx,
                args,
            };
            return Ok((method.handler)(ctx, args, next));
        }
    }
    tracing::trace!(operation, "dispatch: no applicable method");
    Err(NoApplicableMethod {
        operation: operation.to_string(),
    })
}

/// An ordered list of methods dispatched by guard, in reverse
/// registration order (spec.md §4.1).
#[derive(Clone)]
pub struct Generic<Ctx, Args, Out> {
    name: String,
    methods: Vec<Method<Ctx, Args, Out>>,
}

impl<Ctx, Args, Out> Generic<Ctx, Args, Out> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }

    /// Registers a method that always applies, at the head of the list
    /// (runs last, i.e. as the default fallback).
    pub fn prepend(
        &mut self,
        name: impl Into<String>,
        handler: impl for<'a> Fn(&'a Ctx, &'a Args, Next<'a, Ctx, Args, Out>) -> Out + 'static,
    ) {
        self.prepend_guarded(name, |_, _| true, handler);
    }

    /// Registers a guarded method at the head (runs last, as the
    /// default fallback when more specific methods decline to apply).
    pub fn prepend_guarded(
        &mut self,
        name: impl Into<String>,
        guard: impl Fn(&Ctx, &Args) -> bool + 'static,
        handler: impl for<'a> Fn(&'a Ctx, &'a Args, Next<'a, Ctx, Args, Out>) -> Out + 'static,
    ) {
        self.methods.insert(
            0,
            Method {
                name: name.into(),
                guard: Rc::new(guard),
                handler: Rc::new(handler),
            },
        );
    }

    /// Registers a method at the tail (runs first, checked before any
    /// earlier-registered method).
    pub fn append(
        &mut self,
        name: impl Into<String>,
        handler: impl for<'a> Fn(&'a Ctx, &'a Args, Next<'a, Ctx, Args, Out>) -> Out + 'static,
    ) {
        self.append_guarded(name, |_, _| true, handler);
    }

    /// Registers a guarded method at the tail (runs first among
    /// applicable methods).
    pub fn append_guarded(
        &mut self,
        name: impl Into<String>,
        guard: impl Fn(&Ctx, &Args) -> bool + 'static,
        handler: impl for<'a> Fn(&'a Ctx, &'a Args, Next<'a, Ctx, Args, Out>) -> Out + 'static,
    ) {
        self.methods.push(Method {
            name: name.into(),
            guard: Rc::new(guard),
            handler: Rc::new(handler),
        });
        tracing::trace!(operation = %self.name, "dispatch: method registered (append)");
    }

    /// Inserts a method immediately before the named method (i.e. it
    /// will be checked *after* that method in the tail-to-head scan).
    pub fn insert_before(
        &mut self,
        before: &str,
        name: impl Into<String>,
        handler: impl for<'a> Fn(&'a Ctx, &'a Args, Next<'a, Ctx, Args, Out>) -> Out + 'static,
    ) {
        let idx = self
            .methods
            .iter()
            .position(|m| m.name == before)
            .unwrap_or(self.methods.len());
        self.methods.insert(
            idx,
            Method {
                name: name.into(),
                guard: Rc::new(|_, _| true),
                handler: Rc::new(handler),
            },
        );
    }

    /// Inserts a method immediately after the named method (i.e. it
    /// will be checked *before* that method in the tail-to-head scan).
    pub fn insert_after(
        &mut self,
        after: &str,
        name: impl Into<String>,
        handler: impl for<'a> Fn(&'a Ctx, &'a Args, Next<'a, Ctx, Args, Out>) -> Out + 'static,
    ) {
        let idx = self
            .methods
            .iter()
            .position(|m| m.name == after)
            .map(|i| i + 1)
            .unwrap_or(self.methods.len());
        self.methods.insert(
            idx,
            Method {
                name: name.into(),
                guard: Rc::new(|_, _| true),
                handler: Rc::new(handler),
            },
        );
    }

    /// Removes the named method. Returns true if a method was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.methods.len();
        self.methods.retain(|m| m.name != name);
        self.methods.len() != before
    }

    /// Calls the operation, scanning from the most recently registered
    /// method toward the first.
    pub fn call(&self, ctx: &Ctx, args: &Args) -> Result<Out, NoApplicableMethod> {
        dispatch_from(&self.methods, self.methods.len(), &self.name, ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_runs_most_recently_registered_applicable_method() {
        let mut op: Generic<(), i32, &'static str> = Generic::new("classify");
        op.append("default", |_, _, _| "default");
        op.append_guarded("even", |_, n| n % 2 == 0, |_, _, _| "even");
        op.append_guarded(
            "positive_even",
            |_, n| *n > 0 && n % 2 == 0,
            |_, _, _| "positive_even",
        );

        assert_eq!(op.call(&(), &4).unwrap(), "positive_even");
        assert_eq!(op.call(&(), &-4).unwrap(), "even");
        assert_eq!(op.call(&(), &3).unwrap(), "default");
    }

    #[test]
    fn next_resumes_the_scan_above_the_current_method() {
        let mut op: Generic<(), i32, String> = Generic::new("describe");
        op.append("base", |_, n, _| format!("n={n}"));
        op.append("decorate", |_, _n, next: Next<(), i32, String>| {
            let inner = next.call().unwrap();
            format!("decorated({inner})")
        });

        assert_eq!(op.call(&(), &1).unwrap(), "decorated(n=1)");
    }

    #[test]
    fn no_applicable_method_is_a_fault() {
        let op: Generic<(), i32, ()> = Generic::new("noop");
        let err = op.call(&(), &1).unwrap_err();
        assert_eq!(err.operation, "noop");
    }

    #[test]
    fn remove_by_name_drops_the_method() {
        let mut op: Generic<(), i32, &'static str> = Generic::new("op");
        op.append("a", |_, _, _| "a");
        op.append("b", |_, _, _| "b");
        assert!(op.remove("b"));
        assert_eq!(op.call(&(), &0).unwrap(), "a");
    }

    #[test]
    fn context_is_threaded_through_to_handlers() {
        let mut op: Generic<i32, (), i32> = Generic::new("ctx_read");
        op.append("read_ctx", |ctx, _, _| *ctx * 10);
        assert_eq!(op.call(&4, &()).unwrap(), 40);
    }
}

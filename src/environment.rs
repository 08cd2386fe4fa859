use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope frame. Closures keep their defining frame alive
/// through one of these after the call that created it has returned.
pub type Env = Rc<RefCell<Environment>>;

/// One frame of the lexical scope chain.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    /// Binds `name` in this frame, never in an outer one.
    pub fn define(&mut self, name: impl Into<String>, value: Object) -> Object {
        self.store.insert(name.into(), value.clone());
        value
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    /// Whether `name` is bound in this frame itself.
    pub fn contains_local(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    pub fn outer(&self) -> Option<&Env> {
        self.outer.as_ref()
    }
}

//! Lexically scoped environments.
//!
//! An [`Env`] is a frame of bindings with an optional parent. Lookup walks
//! the chain outward; definition always writes the current frame. Closures
//! hold a clone of their definition environment, so frames are reference
//! counted rather than tied to the interpreter's call stack.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::value::Value;

#[derive(Clone)]
pub struct Env {
    frame: Rc<Frame>,
}

struct Frame {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Env>,
}

impl Env {
    /// Creates an empty root environment.
    pub fn root() -> Self {
        Self {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    /// Creates a child frame with this environment as its parent.
    pub fn child(&self) -> Self {
        Self {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Binds `name` in the current frame, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.frame
            .bindings
            .borrow_mut()
            .insert(name.to_owned(), value);
    }

    /// Looks `name` up through the frame chain.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut env = Some(self);
        while let Some(current) = env {
            if let Some(value) = current.frame.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            env = current.frame.parent.as_ref();
        }
        None
    }

    /// Binds a named attribute set. Attribute names live in their own
    /// namespace, keyed with a leading colon so `(def box-first 1)` cannot
    /// clobber the `:box-first` shorthand.
    pub fn define_attrs(&self, name: &str, value: Value) {
        self.define(&format!(":{name}"), value);
    }

    /// Looks up a named attribute set.
    pub fn lookup_attrs(&self, name: &str) -> Option<Value> {
        self.lookup(&format!(":{name}"))
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = {
            let mut depth = 0usize;
            let mut env = Some(self);
            while let Some(current) = env {
                depth += 1;
                env = current.frame.parent.as_ref();
            }
            depth
        };
        f.debug_struct("Env")
            .field("bindings", &self.frame.bindings.borrow().len())
            .field("depth", &depth)
            .finish()
    }
}

//! Tree-walking evaluator for diagram scripts.
//!
//! Evaluation is strictly left-to-right and depth-first. Special forms
//! (`def`, `defattrs`, `defn`, `doseq`, `let`) receive their sub-forms
//! unevaluated; everything else evaluates all arguments first and then
//! applies the resolved operator. The only observable product of a run is
//! the sequence of elements the drawing primitives push into the layout.

use std::rc::Rc;

use bytefield_core::{sink::ElementSink, text::FontConfig};
use bytefield_parser::{Form, FormKind, Span};
use indexmap::IndexMap;
use log::debug;

use crate::{
    builtins,
    config::AppConfig,
    env::Env,
    error::EvalError,
    layout::{LayoutState, ResolvedMetrics},
    value::{Closure, Value},
};

/// One evaluation context: a root environment and the layout it draws into.
///
/// Interpreters are single-use; a fresh one is created per render so user
/// definitions never leak between calls.
#[derive(Debug)]
pub struct Interpreter {
    root: Env,
    pub(crate) layout: LayoutState,
    /// Metrics snapshot taken at the first drawing call. `None` until then,
    /// so scripts can still redefine `boxes-per-row` and friends.
    pub(crate) resolved: Option<ResolvedMetrics>,
}

impl Interpreter {
    pub fn new(config: &AppConfig) -> Self {
        let root = Env::root();
        let fonts = FontConfig::default();
        builtins::install_root(&root, config.metrics(), &fonts);
        Self {
            root,
            layout: LayoutState::new(fonts),
            resolved: None,
        }
    }

    /// Evaluates every top-level form for its drawing side effects.
    pub fn run(&mut self, forms: &[Form]) -> Result<(), EvalError> {
        let env = self.root.clone();
        for form in forms {
            self.eval(form, &env)?;
        }
        debug!(finished = self.layout.is_finished(); "Script evaluated");
        Ok(())
    }

    pub fn into_sink(self) -> ElementSink {
        self.layout.into_sink()
    }

    pub(crate) fn eval(&mut self, form: &Form, env: &Env) -> Result<Value, EvalError> {
        match form.kind() {
            FormKind::Nil => Ok(Value::Nil),
            FormKind::Int(n) => Ok(Value::Int(*n)),
            FormKind::Float(n) => Ok(Value::Float(*n)),
            FormKind::Str(s) => Ok(Value::Str(Rc::from(s.as_str()))),
            FormKind::Keyword(name) => Ok(Value::Keyword(Rc::from(name.as_str()))),
            FormKind::Symbol(name) => {
                env.lookup(name).ok_or_else(|| EvalError::UnboundSymbol {
                    name: name.clone(),
                    span: form.span(),
                })
            }
            FormKind::Vector(items) => {
                let values = self.eval_all(items, env)?;
                Ok(Value::Vector(Rc::new(values)))
            }
            FormKind::Set(items) => {
                let values = self.eval_all(items, env)?;
                Ok(Value::Set(Rc::new(values)))
            }
            FormKind::Map(pairs) => {
                let mut map = IndexMap::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let FormKind::Keyword(name) = key.kind() else {
                        return Err(EvalError::TypeMismatch {
                            context: String::from("map key"),
                            expected: String::from("keyword"),
                            actual: format!("{key}"),
                            span: key.span(),
                        });
                    };
                    map.insert(name.clone(), self.eval(value, env)?);
                }
                Ok(Value::Map(Rc::new(map)))
            }
            FormKind::List(items) => self.eval_list(form, items, env),
        }
    }

    fn eval_all(&mut self, forms: &[Form], env: &Env) -> Result<Vec<Value>, EvalError> {
        forms.iter().map(|form| self.eval(form, env)).collect()
    }

    fn eval_list(&mut self, form: &Form, items: &[Form], env: &Env) -> Result<Value, EvalError> {
        let Some(head) = items.first() else {
            return Err(EvalError::MalformedForm {
                callee: String::from("()"),
                reason: String::from("empty form cannot be called"),
                span: form.span(),
            });
        };

        if let FormKind::Symbol(name) = head.kind() {
            match name.as_str() {
                "def" => return self.special_def(form, &items[1..], env),
                "defattrs" => return self.special_defattrs(form, &items[1..], env),
                "defn" => return self.special_defn(form, &items[1..], env),
                "doseq" => return self.special_doseq(form, &items[1..], env),
                "let" => return self.special_let(form, &items[1..], env),
                _ => {}
            }
        }

        let callee = self.eval(head, env)?;
        match callee {
            Value::Builtin(builtin) => {
                let args = self.eval_all(&items[1..], env)?;
                self.call_builtin(builtin, &args, env, form.span())
            }
            Value::Closure(closure) => {
                let args = self.eval_all(&items[1..], env)?;
                self.apply_closure(&closure, args, form.span())
            }
            other => Err(EvalError::TypeMismatch {
                context: format!("call of {head}"),
                expected: String::from("function"),
                actual: other.type_name().to_owned(),
                span: head.span(),
            }),
        }
    }

    fn apply_closure(
        &mut self,
        closure: &Closure,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, EvalError> {
        if args.len() != closure.params().len() {
            return Err(EvalError::ArityMismatch {
                callee: closure.name().to_owned(),
                expected: closure.params().len().to_string(),
                actual: args.len(),
                span,
            });
        }

        let frame = closure.env().child();
        for (param, arg) in closure.params().iter().zip(args) {
            frame.define(param, arg);
        }

        let mut result = Value::Nil;
        for form in closure.body() {
            result = self.eval(form, &frame)?;
        }
        Ok(result)
    }

    /// `(def name value)`
    fn special_def(&mut self, form: &Form, rest: &[Form], env: &Env) -> Result<Value, EvalError> {
        let [name_form, value_form] = rest else {
            return Err(EvalError::MalformedForm {
                callee: String::from("def"),
                reason: String::from("expected a name and a value"),
                span: form.span(),
            });
        };
        let FormKind::Symbol(name) = name_form.kind() else {
            return Err(EvalError::TypeMismatch {
                context: String::from("def name"),
                expected: String::from("symbol"),
                actual: format!("{name_form}"),
                span: name_form.span(),
            });
        };
        let value = self.eval(value_form, env)?;
        env.define(name, value);
        Ok(Value::Nil)
    }

    /// `(defattrs :name {property map})`
    fn special_defattrs(
        &mut self,
        form: &Form,
        rest: &[Form],
        env: &Env,
    ) -> Result<Value, EvalError> {
        let [name_form, value_form] = rest else {
            return Err(EvalError::MalformedForm {
                callee: String::from("defattrs"),
                reason: String::from("expected a keyword name and a property map"),
                span: form.span(),
            });
        };
        let FormKind::Keyword(name) = name_form.kind() else {
            return Err(EvalError::TypeMismatch {
                context: String::from("defattrs name"),
                expected: String::from("keyword"),
                actual: format!("{name_form}"),
                span: name_form.span(),
            });
        };
        let value = self.eval(value_form, env)?;
        let Value::Map(map) = value else {
            return Err(EvalError::TypeMismatch {
                context: String::from("defattrs value"),
                expected: String::from("map"),
                actual: value.type_name().to_owned(),
                span: value_form.span(),
            });
        };
        let attrs = builtins::attrs_from_map(&map, value_form.span())?;
        env.define_attrs(name, Value::Attrs(Rc::new(attrs)));
        Ok(Value::Nil)
    }

    /// `(defn name docstring? [params] body...)`
    fn special_defn(&mut self, form: &Form, rest: &[Form], env: &Env) -> Result<Value, EvalError> {
        let Some((name_form, rest)) = rest.split_first() else {
            return Err(EvalError::MalformedForm {
                callee: String::from("defn"),
                reason: String::from("expected a name, a parameter vector, and a body"),
                span: form.span(),
            });
        };
        let FormKind::Symbol(name) = name_form.kind() else {
            return Err(EvalError::TypeMismatch {
                context: String::from("defn name"),
                expected: String::from("symbol"),
                actual: format!("{name_form}"),
                span: name_form.span(),
            });
        };

        // An optional doc string precedes the parameter vector and has no
        // semantic effect.
        let rest = match rest.first().map(Form::kind) {
            Some(FormKind::Str(_)) => &rest[1..],
            _ => rest,
        };

        let Some((params_form, body)) = rest.split_first() else {
            return Err(EvalError::MalformedForm {
                callee: String::from("defn"),
                reason: String::from("missing parameter vector"),
                span: form.span(),
            });
        };
        let FormKind::Vector(param_forms) = params_form.kind() else {
            return Err(EvalError::TypeMismatch {
                context: format!("defn {name} parameters"),
                expected: String::from("vector of symbols"),
                actual: format!("{params_form}"),
                span: params_form.span(),
            });
        };
        let mut params = Vec::with_capacity(param_forms.len());
        for param in param_forms {
            let FormKind::Symbol(param_name) = param.kind() else {
                return Err(EvalError::TypeMismatch {
                    context: format!("defn {name} parameter"),
                    expected: String::from("symbol"),
                    actual: format!("{param}"),
                    span: param.span(),
                });
            };
            params.push(param_name.clone());
        }

        let closure = Closure::new(name.clone(), params, body.to_vec(), env.clone());
        env.define(name, Value::Closure(Rc::new(closure)));
        Ok(Value::Nil)
    }

    /// `(doseq [name sequence] body...)`
    fn special_doseq(&mut self, form: &Form, rest: &[Form], env: &Env) -> Result<Value, EvalError> {
        let Some((binding_form, body)) = rest.split_first() else {
            return Err(EvalError::MalformedForm {
                callee: String::from("doseq"),
                reason: String::from("expected a binding vector and a body"),
                span: form.span(),
            });
        };
        let FormKind::Vector(binding) = binding_form.kind() else {
            return Err(EvalError::TypeMismatch {
                context: String::from("doseq binding"),
                expected: String::from("vector"),
                actual: format!("{binding_form}"),
                span: binding_form.span(),
            });
        };
        let [name_form, seq_form] = binding.as_slice() else {
            return Err(EvalError::MalformedForm {
                callee: String::from("doseq"),
                reason: String::from("binding vector must hold a name and a sequence"),
                span: binding_form.span(),
            });
        };
        let FormKind::Symbol(name) = name_form.kind() else {
            return Err(EvalError::TypeMismatch {
                context: String::from("doseq binding name"),
                expected: String::from("symbol"),
                actual: format!("{name_form}"),
                span: name_form.span(),
            });
        };

        let sequence = self.eval(seq_form, env)?;
        let elements: Vec<Value> = match &sequence {
            Value::Vector(items) | Value::Set(items) => items.as_ref().clone(),
            other => {
                return Err(EvalError::TypeMismatch {
                    context: String::from("doseq sequence"),
                    expected: String::from("vector or set"),
                    actual: other.type_name().to_owned(),
                    span: seq_form.span(),
                });
            }
        };

        for element in elements {
            let frame = env.child();
            frame.define(name, element);
            for body_form in body {
                self.eval(body_form, &frame)?;
            }
        }
        Ok(Value::Nil)
    }

    /// `(let [name value ...] body...)`
    fn special_let(&mut self, form: &Form, rest: &[Form], env: &Env) -> Result<Value, EvalError> {
        let Some((binding_form, body)) = rest.split_first() else {
            return Err(EvalError::MalformedForm {
                callee: String::from("let"),
                reason: String::from("expected a binding vector and a body"),
                span: form.span(),
            });
        };
        let FormKind::Vector(binding) = binding_form.kind() else {
            return Err(EvalError::TypeMismatch {
                context: String::from("let binding"),
                expected: String::from("vector"),
                actual: format!("{binding_form}"),
                span: binding_form.span(),
            });
        };
        if binding.len() % 2 != 0 {
            return Err(EvalError::MalformedForm {
                callee: String::from("let"),
                reason: String::from("binding vector must pair names with values"),
                span: binding_form.span(),
            });
        }

        // Bindings are sequential: each value sees the ones before it.
        let frame = env.child();
        for pair in binding.chunks_exact(2) {
            let FormKind::Symbol(name) = pair[0].kind() else {
                return Err(EvalError::TypeMismatch {
                    context: String::from("let binding name"),
                    expected: String::from("symbol"),
                    actual: format!("{}", pair[0]),
                    span: pair[0].span(),
                });
            };
            let value = self.eval(&pair[1], &frame)?;
            frame.define(name, value);
        }

        let mut result = Value::Nil;
        for body_form in body {
            result = self.eval(body_form, &frame)?;
        }
        Ok(result)
    }
}

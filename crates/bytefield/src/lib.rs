//! Byte field diagram generation.
//!
//! This crate evaluates a small s-expression description language and
//! renders the result as an SVG byte field diagram, the kind used to
//! document binary protocols and file formats. A script draws boxes into a
//! fixed-width grid of byte columns; the engine tracks the cursor, places
//! every element at absolute coordinates, and assembles the final document.
//!
//! # Example
//!
//! ```
//! let source = r#"
//!     (draw-column-headers)
//!     (draw-box :text (hex-text "11") :span 2)
//!     (next-row)
//!     (draw-bottom)
//! "#;
//! let svg = bytefield::generate(source, &bytefield::Options::default()).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod export;
pub mod layout;
pub mod value;

pub use config::{AppConfig, Metrics, Options};
pub use error::{BytefieldError, EvalError};

use eval::Interpreter;
use log::info;

/// A reusable diagram generator holding the layout configuration.
///
/// Each [`generate`](Generator::generate) call evaluates in a fresh
/// environment; no script state survives between calls, so one generator
/// can serve many independent renders.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: AppConfig,
}

impl Generator {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Renders one diagram description to SVG text.
    ///
    /// # Errors
    ///
    /// Returns [`BytefieldError::Parse`] when the source does not read as
    /// balanced forms, and [`BytefieldError::Eval`] for unbound symbols,
    /// arity or type mismatches, layout overflow, or drawing after
    /// `draw-bottom`. Either way no partial output is produced.
    pub fn generate(&self, source: &str, options: &Options) -> Result<String, BytefieldError> {
        let forms = bytefield_parser::read(source)
            .map_err(|err| BytefieldError::new_parse_error(err, source))?;
        info!(forms = forms.len(); "Read diagram description");

        let mut interpreter = Interpreter::new(&self.config);
        interpreter
            .run(&forms)
            .map_err(|err| BytefieldError::new_eval_error(err, source))?;

        Ok(export::render(interpreter.into_sink(), options.embedded))
    }
}

/// Renders a diagram description with default configuration.
///
/// # Errors
///
/// See [`Generator::generate`].
pub fn generate(source: &str, options: &Options) -> Result<String, BytefieldError> {
    Generator::default().generate(source, options)
}

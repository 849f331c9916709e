//! WASM bindings for Netlist Front.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmEvaluator, tokenize_netlist } from 'netlist_front';
//!
//! await init();
//!
//! const evaluator = new WasmEvaluator();
//! evaluator.set_parameter("vdd", 3.3);
//! const half = evaluator.evaluate("vdd / 2");
//!
//! // ["WORD R1", "WORD in", "WORD out", "VALUE 10k", "NEWLINE \n", ...]
//! const tokens = tokenize_netlist("R1 in out 10k\n.end", false);
//! ```

use wasm_bindgen::prelude::*;

use crate::error::NetlistError;
use crate::expr::{EvaluatorConfig, ExpressionEvaluator};
use crate::netlist::{self, NetlistLexerSettings, NetlistTokenKind};

fn to_js(error: NetlistError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Expression evaluator usable from JavaScript.
#[wasm_bindgen]
pub struct WasmEvaluator {
    evaluator: ExpressionEvaluator,
}

#[wasm_bindgen]
impl WasmEvaluator {
    /// Create an evaluator with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmEvaluator {
        WasmEvaluator {
            evaluator: ExpressionEvaluator::new(),
        }
    }

    /// Create an evaluator whose random functions start from `seed`.
    #[wasm_bindgen]
    pub fn with_seed(seed: u64) -> WasmEvaluator {
        WasmEvaluator {
            evaluator: ExpressionEvaluator::with_config(EvaluatorConfig::new().with_seed(seed)),
        }
    }

    /// Set (or replace) a parameter.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, name: &str, value: f64) {
        self.evaluator.set_parameter(name, value);
    }

    /// Evaluate an expression.
    ///
    /// # Returns
    /// The value, or an error string if the expression is invalid.
    #[wasm_bindgen]
    pub fn evaluate(&self, expression: &str) -> Result<f64, JsValue> {
        self.evaluator.evaluate(expression).map_err(to_js)
    }
}

impl Default for WasmEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenize a netlist into `"KIND text"` strings, sentinel excluded.
#[wasm_bindgen]
pub fn tokenize_netlist(text: &str, has_title: bool) -> Result<Vec<String>, JsValue> {
    let settings = NetlistLexerSettings::new().with_title(has_title);
    let tokens = netlist::tokenize(text, &settings).map_err(to_js)?;

    Ok(tokens
        .iter()
        .filter(|token| !token.is_end_of_input())
        .map(|token| {
            let kind = NetlistTokenKind::from_code(token.token_type)
                .map_or("UNKNOWN", NetlistTokenKind::name);
            format!("{} {}", kind, token.text)
        })
        .collect())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! WASM bindings for the `bitfield-decoder` schema codec.
//!
//! JavaScript hands over numbers (or `BigInt`s) and arrays of them; this crate
//! converts those dynamic values into the typed shapes the decoder works on,
//! which is where non-integral input and unsupported containers are rejected.
//!
//! ```text
//! // const ecal = new WasmDecoder("system:4,cryo:1,module:11,type:3,subtype:3,cell:6,eta:9");
//! // ecal.value("module", 36280732133);         // 79
//! // ecal.setValue(36280732133);
//! // ecal.value("eta");                          // 135
//! // ecal.decodeMany("cell", [[36280732133], [35987131109, 0]]);  // [[10], [4, 0]]
//! ```
//!
//! Errors are returned to JavaScript as strings holding the error message.

mod convert;

use bitfield_decoder::{Decoder, Schema, serde::SchemaDef};
use wasm_bindgen::prelude::*;

/// A decoder usable from JavaScript. Owns its schema and current value register.
#[wasm_bindgen]
pub struct WasmDecoder {
    decoder: Decoder,
}

#[wasm_bindgen]
impl WasmDecoder {
    /// Builds a decoder from a description such as `"x:16,y:-16"`.
    #[wasm_bindgen(constructor)]
    pub fn new(description: &str) -> Result<WasmDecoder, JsValue> {
        let decoder = Decoder::new(description).map_err(convert::error_to_js)?;
        Ok(WasmDecoder { decoder })
    }

    /// Builds a decoder from a JSON schema definition (see [SchemaDef]).
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(schema_json: &str) -> Result<WasmDecoder, JsValue> {
        let def: SchemaDef = serde_json::from_str(schema_json).map_err(convert::error_to_js)?;
        let schema = Schema::try_from(def).map_err(convert::error_to_js)?;
        Ok(WasmDecoder {
            decoder: Decoder::from_schema(schema, Default::default()),
        })
    }

    /// Decodes `field` from `value`, or from the stored value when `value` is omitted.
    pub fn value(&self, field: &str, value: JsValue) -> Result<JsValue, JsValue> {
        let result = if value.is_undefined() || value.is_null() {
            self.decoder.value(field)
        } else {
            let packed = convert::json_to_scalar(&from_js(value)?).map_err(convert::error_to_js)?;
            self.decoder.decode(packed, field)
        };
        let decoded = result.map_err(convert::error_to_js)?;

        convert::to_js(&convert::scalar_to_out(decoded))
    }

    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&mut self, value: JsValue) -> Result<(), JsValue> {
        let packed = convert::json_to_scalar(&from_js(value)?).map_err(convert::error_to_js)?;
        self.decoder.set_value(packed);
        Ok(())
    }

    /// Decodes `field` from a number or a (nested, possibly jagged) array of numbers,
    /// returning the same shape.
    #[wasm_bindgen(js_name = decodeMany)]
    pub fn decode_many(&self, field: &str, values: JsValue) -> Result<JsValue, JsValue> {
        let packed = convert::json_to_packed(&from_js(values)?).map_err(convert::error_to_js)?;
        let decoded = self
            .decoder
            .decode_many(&packed, field)
            .map_err(convert::error_to_js)?;

        convert::to_js(&convert::decoded_to_out(decoded))
    }

    /// Field specifications in declaration order.
    pub fn fields(&self) -> Result<JsValue, JsValue> {
        convert::to_js(&self.decoder.schema().fields())
    }

    /// Human readable table of the schema.
    pub fn describe(&self) -> String {
        self.decoder.schema().to_string()
    }
}

fn from_js(value: JsValue) -> Result<serde_json::Value, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Output rendering: one event stream feeding two sinks, line-oriented
//! human text and a JSON tree. Page and field decoders emit labelled
//! values; which sink is active is decided once, up front.

use serde_json::{Map, Value, json};

/// Derive a JSON key from a display name: lowercase, non-alphanumerics
/// collapsed to single underscores.
pub fn snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_us = false;
        } else if !last_us {
            out.push('_');
            last_us = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOpts {
    pub json: bool,
    /// Suppress headings and labels; print bare values.
    pub quiet: bool,
    /// Verbose decoded output.
    pub long: bool,
    /// Repeat count of `--hex`.
    pub hex: u8,
    /// Attach per-page-control raw bytes to the JSON tree.
    pub inner_hex: bool,
}

enum Node {
    Obj(Map<String, Value>),
    Arr(Vec<Value>),
}

/// The dual sink. Human lines are buffered so the driver controls when
/// (and whether) they reach stdout; the JSON tree is emitted at the end
/// of the run.
pub struct Renderer {
    pub opts: RenderOpts,
    lines: Vec<String>,
    root: Map<String, Value>,
    stack: Vec<(String, Node)>,
}

impl Renderer {
    pub fn new(opts: RenderOpts) -> Self {
        Renderer {
            opts,
            lines: Vec::new(),
            root: Map::new(),
            stack: Vec::new(),
        }
    }

    /// Append one human-readable line (ignored under `--json`).
    pub fn hr(&mut self, line: impl Into<String>) {
        if !self.opts.json {
            self.lines.push(line.into());
        }
    }

    /// Human lines collected so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn insert(&mut self, key: &str, value: Value) {
        if !self.opts.json {
            return;
        }
        match self.stack.last_mut() {
            Some((_, Node::Obj(m))) => {
                m.insert(key.to_string(), value);
            },
            Some((_, Node::Arr(a))) => a.push(value),
            None => {
                self.root.insert(key.to_string(), value);
            },
        }
    }

    /// Open a nested JSON object under `key`.
    pub fn open_obj(&mut self, key: &str) {
        if self.opts.json {
            self.stack.push((key.to_string(), Node::Obj(Map::new())));
        }
    }

    /// Open a nested JSON array under `key`.
    pub fn open_arr(&mut self, key: &str) {
        if self.opts.json {
            self.stack.push((key.to_string(), Node::Arr(Vec::new())));
        }
    }

    /// Close the innermost open container.
    pub fn close(&mut self) {
        if !self.opts.json {
            return;
        }
        if let Some((key, node)) = self.stack.pop() {
            let value = match node {
                Node::Obj(m) => Value::Object(m),
                Node::Arr(a) => Value::Array(a),
            };
            self.insert(&key, value);
        }
    }

    pub fn kv_int(&mut self, key: &str, value: u64, hex: bool, desc: Option<&str>) {
        if hex {
            let mut obj = Map::new();
            obj.insert("value".into(), json!(value));
            obj.insert("hex".into(), json!(format!("{value:x}")));
            if let Some(d) = desc {
                obj.insert("description".into(), json!(d));
            }
            self.insert(key, Value::Object(obj));
        } else if let Some(d) = desc {
            self.insert(key, json!({"value": value, "description": d}));
        } else {
            self.insert(key, json!(value));
        }
    }

    pub fn kv_signed(&mut self, key: &str, value: i64) {
        self.insert(key, json!(value));
    }

    pub fn kv_str(&mut self, key: &str, value: &str) {
        self.insert(key, json!(value));
    }

    pub fn kv_bool(&mut self, key: &str, value: bool) {
        self.insert(key, json!(value));
    }

    pub fn kv_hex_bytes(&mut self, key: &str, bytes: &[u8]) {
        self.insert(key, json!(hex::encode(bytes)));
    }

    /// Finish: drain any unbalanced containers and return the tree.
    pub fn into_json(mut self) -> Value {
        while !self.stack.is_empty() {
            self.close();
        }
        Value::Object(self.root)
    }
}

//! Renders runtime values as source literals for the compiled targets.
//!
//! Rendering never fails. Values the emitter has no typed form for fall back to
//! their plain string form, so a bad shape surfaces as a compiler diagnostic of the
//! submission rather than as an error in the judge itself.

use itertools::Itertools;
use serde_json::{Number, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralTarget {
    Cpp,
    Java,
}

/// Static type of an emitted value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    Long,
    Double,
    Str,
    List(Box<ValueType>),
}

impl ValueType {
    fn list(elem: ValueType) -> Self {
        ValueType::List(Box::new(elem))
    }

    /// Infers the type of a value. Lists take the type of their first element,
    /// widened across numeric elements so a literal never narrows.
    pub fn infer(value: &Value) -> Option<ValueType> {
        match value {
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Number(n) => Some(number_type(n)),
            Value::String(_) => Some(ValueType::Str),
            Value::Array(items) => infer_elements(items).map(ValueType::list),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Parses a declared parameter type such as `int[]`, `List[str]`,
    /// `vector<vector<int>>` or `long`.
    pub fn from_declared(declared: &str) -> Option<ValueType> {
        let compact: String = declared
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        parse_declared(&compact)
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Bool, Value::Bool(_)) | (ValueType::Str, Value::String(_)) => true,
            (ValueType::Int, Value::Number(n)) => n.as_i64().is_some_and(|i| i32::try_from(i).is_ok()),
            (ValueType::Long, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ValueType::Double, Value::Number(_)) => true,
            (ValueType::List(elem), Value::Array(items)) => items.iter().all(|i| elem.accepts(i)),
            _ => false,
        }
    }

    pub fn cpp_name(&self) -> String {
        match self {
            ValueType::Bool => "bool".to_string(),
            ValueType::Int => "int".to_string(),
            ValueType::Long => "long long".to_string(),
            ValueType::Double => "double".to_string(),
            ValueType::Str => "std::string".to_string(),
            ValueType::List(elem) => format!("std::vector<{}>", elem.cpp_name()),
        }
    }

    pub fn java_name(&self) -> String {
        match self {
            ValueType::Bool => "boolean".to_string(),
            ValueType::Int => "int".to_string(),
            ValueType::Long => "long".to_string(),
            ValueType::Double => "double".to_string(),
            ValueType::Str => "String".to_string(),
            ValueType::List(elem) => format!("{}[]", elem.java_name()),
        }
    }

    fn name_for(&self, target: LiteralTarget) -> String {
        match target {
            LiteralTarget::Cpp => self.cpp_name(),
            LiteralTarget::Java => self.java_name(),
        }
    }
}

fn number_type(n: &Number) -> ValueType {
    match n.as_i64() {
        Some(i) if i32::try_from(i).is_ok() => ValueType::Int,
        Some(_) => ValueType::Long,
        None if n.is_u64() => ValueType::Long,
        None => ValueType::Double,
    }
}

fn widen(acc: ValueType, next: ValueType) -> ValueType {
    use ValueType::*;
    match (acc, next) {
        (Int, Long) | (Long, Int) => Long,
        (Int | Long, Double) | (Double, Int | Long) => Double,
        (List(a), List(b)) => ValueType::list(widen(*a, *b)),
        (acc, _) => acc,
    }
}

fn infer_elements(items: &[Value]) -> Option<ValueType> {
    let mut saw_list = false;
    let inferred = items.iter().fold(None, |acc: Option<ValueType>, item| {
        saw_list |= item.is_array();
        match (acc, ValueType::infer(item)) {
            (None, next) => next,
            (Some(acc), Some(next)) => Some(widen(acc, next)),
            (acc, None) => acc,
        }
    });

    // Only empty inner lists seen
    match inferred {
        None if saw_list => Some(ValueType::list(ValueType::Int)),
        other => other,
    }
}

fn parse_declared(decl: &str) -> Option<ValueType> {
    if let Some(inner) = decl.strip_suffix("[]") {
        return parse_declared(inner).map(ValueType::list);
    }

    const GENERIC_LISTS: [(&str, char); 5] = [
        ("std::vector<", '>'),
        ("vector<", '>'),
        ("list<", '>'),
        ("list[", ']'),
        ("array<", '>'),
    ];
    for (open, close) in GENERIC_LISTS {
        if let Some(inner) = decl.strip_prefix(open).and_then(|rest| rest.strip_suffix(close)) {
            return parse_declared(inner).map(ValueType::list);
        }
    }

    match decl {
        "int" | "integer" | "i32" => Some(ValueType::Int),
        "long" | "longlong" | "i64" => Some(ValueType::Long),
        "double" | "float" | "f64" => Some(ValueType::Double),
        "bool" | "boolean" => Some(ValueType::Bool),
        "str" | "string" | "std::string" => Some(ValueType::Str),
        _ => None,
    }
}

/// Picks the static type used to emit `value`: the declared hint when it fits
/// the value's shape, otherwise whatever can be inferred. Empty lists without a
/// usable hint default to a list of `int`.
pub fn resolve_type(value: &Value, hint: Option<&ValueType>) -> Option<ValueType> {
    if let Some(hint) = hint.filter(|hint| hint.accepts(value)) {
        return Some(hint.clone());
    }
    match value {
        Value::Array(items) if items.is_empty() => Some(ValueType::list(ValueType::Int)),
        _ => ValueType::infer(value),
    }
}

pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

pub fn emit(value: &Value, target: LiteralTarget) -> String {
    emit_typed(value, None, target)
}

pub fn emit_typed(value: &Value, hint: Option<&ValueType>, target: LiteralTarget) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_literal(n, target),
        Value::String(s) => quote(s),
        Value::Array(items) => match resolve_type(value, hint) {
            Some(ty @ ValueType::List(_)) => {
                let body = braced_items(items, &ty, target);
                match target {
                    LiteralTarget::Cpp => format!("{}{}", ty.cpp_name(), body),
                    LiteralTarget::Java => format!("new {}{}", ty.java_name(), body),
                }
            }
            _ => {
                let body = format!("{{{}}}", items.iter().map(|i| emit(i, target)).join(", "));
                match target {
                    LiteralTarget::Cpp => body,
                    LiteralTarget::Java => format!("new Object[]{}", body),
                }
            }
        },
        Value::Null => match target {
            LiteralTarget::Cpp => "nullptr".to_string(),
            LiteralTarget::Java => "null".to_string(),
        },
        Value::Object(_) => value.to_string(),
    }
}

fn number_literal(n: &Number, target: LiteralTarget) -> String {
    match n.as_i64() {
        Some(i) if i32::try_from(i).is_err() => match target {
            LiteralTarget::Cpp => format!("{}LL", i),
            LiteralTarget::Java => format!("{}L", i),
        },
        _ => n.to_string(),
    }
}

/// `{a, b, c}` with elements of a list typed `ty`. Nested lists stay bare braces,
/// which both targets accept inside an initializer of a typed outer collection.
fn braced_items(items: &[Value], ty: &ValueType, target: LiteralTarget) -> String {
    let elem = match ty {
        ValueType::List(elem) => Some(elem.as_ref()),
        _ => None,
    };
    let rendered = items
        .iter()
        .map(|item| match (item, elem) {
            (Value::Array(inner), Some(elem @ ValueType::List(_))) => {
                braced_items(inner, elem, target)
            }
            _ => emit_typed(item, elem, target),
        })
        .join(", ");
    format!("{{{}}}", rendered)
}

/// A typed local declaration, e.g. `std::vector<int> arg0 = std::vector<int>{1, 2};`.
pub fn declare(name: &str, value: &Value, hint: Option<&ValueType>, target: LiteralTarget) -> String {
    let ty = resolve_type(value, hint);
    let literal = emit_typed(value, ty.as_ref(), target);
    let type_name = match (&ty, target) {
        (Some(ty), target) => ty.name_for(target),
        (None, LiteralTarget::Cpp) => "auto".to_string(),
        (None, LiteralTarget::Java) => "Object".to_string(),
    };
    format!("{} {} = {};", type_name, name, literal)
}

//! Parameter binding.
//!
//! A [`ParamSchema`] declares the complete field set a demo's external model
//! accepts. [`ParamBuilder`] is the fluent binder: one chained setter per field,
//! each taking the raw control text plus the setter's semantic type. Only
//! [`ParamBuilder::build`] materializes an immutable [`ParameterRecord`].

use hashbrown::HashMap;

use crate::config::CoercionPolicy;
use crate::error::{ModelError, PageError, PageResult};
use crate::render::SolverBranch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Integer,
    /// Opaque string understood only by the model (boundary, solver method, maze).
    Enum,
    /// Opaque random seed text.
    Seed,
    /// Three numbers passed to a three-argument setter.
    Triple,
}

impl FieldKind {
    fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Float | FieldKind::Integer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Setter name on the external builder.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Closed interval numeric values are clamped into.
    pub clamp: Option<(f64, f64)>,
    /// Value bound for unparseable text under [`CoercionPolicy::Fallback`].
    pub fallback: f64,
    /// Restricts the field to one solver branch.
    pub branch: Option<SolverBranch>,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            clamp: None,
            fallback: 0.0,
            branch: None,
        }
    }

    pub fn float(name: &'static str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn enumerated(name: &'static str) -> Self {
        Self::new(name, FieldKind::Enum)
    }

    pub fn seed(name: &'static str) -> Self {
        Self::new(name, FieldKind::Seed)
    }

    pub fn triple(name: &'static str) -> Self {
        Self::new(name, FieldKind::Triple)
    }

    pub fn clamped(mut self, lo: f64, hi: f64) -> Self {
        self.clamp = Some((lo, hi));
        self
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn only_for(mut self, branch: SolverBranch) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn applies_to(&self, branch: Option<SolverBranch>) -> bool {
        match self.branch {
            None => true,
            Some(b) => branch == Some(b),
        }
    }

    /// Clamp (NaN goes to the lower bound) and truncate integers.
    pub fn normalize(&self, v: f64) -> f64 {
        let mut v = v;
        if let Some((lo, hi)) = self.clamp {
            v = if v.is_nan() { lo } else { v.max(lo).min(hi) };
        }
        if self.kind == FieldKind::Integer && v.is_finite() {
            v = v.trunc();
        }
        v
    }

    fn coerce(&self, raw: &str, policy: CoercionPolicy) -> PageResult<f64> {
        let v = match parse_js_number(raw) {
            Some(v) => v,
            None => match policy {
                CoercionPolicy::Fallback => self.fallback,
                CoercionPolicy::Passthrough => f64::NAN,
                CoercionPolicy::Reject => {
                    return Err(PageError::InvalidNumber {
                        field: self.name.to_string(),
                        raw: raw.to_string(),
                    })
                }
            },
        };
        Ok(self.normalize(v))
    }
}

/// Parse control text the way browser `Number(text)` does; `None` is NaN.
pub fn parse_js_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return Some(0.0);
    }

    match t {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16u32), ("0o", 8), ("0b", 2)] {
        let Some(head) = t.get(..2) else {
            break;
        };
        if head.eq_ignore_ascii_case(prefix) {
            let digits = &t[2..];
            if digits.is_empty() {
                return None;
            }
            return digits.chars().try_fold(0.0f64, |acc, c| {
                c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
            });
        }
    }

    // `str::parse` also accepts "inf"/"nan"; the browser does not.
    let decimal_only = t
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal_only {
        return None;
    }
    t.parse::<f64>().ok()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Triple([f64; 3]),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_triple(&self) -> Option<[f64; 3]> {
        match self {
            ParamValue::Triple(v) => Some(*v),
            _ => None,
        }
    }
}

/// The complete field set one demo's model accepts.
#[derive(Debug, Clone)]
pub struct ParamSchema {
    fields: Vec<FieldSpec>,
    index: HashMap<&'static str, usize>,
}

impl ParamSchema {
    /// Duplicate names keep their first declaration.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, f) in fields.iter().enumerate() {
            index.entry(f.name).or_insert(i);
        }
        Self { fields, index }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Names a record must carry for `branch`, in declaration order.
    pub fn required_fields(
        &self,
        branch: Option<SolverBranch>,
    ) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(move |f| f.applies_to(branch))
            .map(|f| f.name)
    }

    pub fn builder(&self, policy: CoercionPolicy) -> ParamBuilder<'_> {
        ParamBuilder {
            schema: self,
            policy,
            branch: None,
            values: vec![None; self.fields.len()],
        }
    }
}

/// Fluent binder. Setters consume and return the builder so calls chain with `?`.
#[derive(Debug, Clone)]
pub struct ParamBuilder<'a> {
    schema: &'a ParamSchema,
    policy: CoercionPolicy,
    branch: Option<SolverBranch>,
    values: Vec<Option<ParamValue>>,
}

impl<'a> ParamBuilder<'a> {
    pub fn branch(mut self, branch: SolverBranch) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn selected_branch(&self) -> Option<SolverBranch> {
        self.branch
    }

    /// Numeric field from raw control text.
    pub fn number(self, name: &str, raw: &str) -> PageResult<Self> {
        let (i, spec) = self.lookup(name, FieldKind::Float)?;
        let v = spec.coerce(raw, self.policy)?;
        Ok(self.put(i, ParamValue::Number(v)))
    }

    /// Numeric field from an already-computed value (clamped like raw input).
    pub fn number_value(self, name: &str, v: f64) -> PageResult<Self> {
        let (i, spec) = self.lookup(name, FieldKind::Float)?;
        let v = spec.normalize(v);
        Ok(self.put(i, ParamValue::Number(v)))
    }

    /// Enumerated field; membership is the model's concern.
    pub fn text(self, name: &str, raw: &str) -> PageResult<Self> {
        let (i, _) = self.lookup(name, FieldKind::Enum)?;
        Ok(self.put(i, ParamValue::Text(raw.to_string())))
    }

    pub fn seed(self, name: &str, raw: &str) -> PageResult<Self> {
        let (i, _) = self.lookup(name, FieldKind::Seed)?;
        Ok(self.put(i, ParamValue::Text(raw.to_string())))
    }

    pub fn triple(self, name: &str, raw: [&str; 3]) -> PageResult<Self> {
        let (i, spec) = self.lookup(name, FieldKind::Triple)?;
        let mut out = [0.0; 3];
        for (slot, r) in out.iter_mut().zip(raw) {
            *slot = spec.coerce(r, self.policy)?;
        }
        Ok(self.put(i, ParamValue::Triple(out)))
    }

    pub fn triple_value(self, name: &str, v: [f64; 3]) -> PageResult<Self> {
        let (i, spec) = self.lookup(name, FieldKind::Triple)?;
        let out = v.map(|x| spec.normalize(x));
        Ok(self.put(i, ParamValue::Triple(out)))
    }

    pub fn build(self) -> PageResult<ParameterRecord> {
        let mut entries = Vec::with_capacity(self.values.len());
        for (spec, value) in self.schema.fields.iter().zip(self.values) {
            match (spec.applies_to(self.branch), value) {
                (true, Some(v)) => entries.push((spec.name, v)),
                (true, None) => {
                    return Err(PageError::MissingField {
                        field: spec.name.to_string(),
                    })
                }
                (false, Some(_)) => {
                    return Err(PageError::UnexpectedField {
                        field: spec.name.to_string(),
                    })
                }
                (false, None) => {}
            }
        }
        Ok(ParameterRecord {
            entries,
            branch: self.branch,
        })
    }

    fn lookup(&self, name: &str, setter: FieldKind) -> PageResult<(usize, &'a FieldSpec)> {
        let schema: &'a ParamSchema = self.schema;
        let Some(&i) = schema.index.get(name) else {
            return Err(PageError::UnknownField {
                field: name.to_string(),
            });
        };
        let spec = &schema.fields[i];
        let compatible = if setter.is_numeric() {
            spec.kind.is_numeric()
        } else {
            spec.kind == setter
        };
        if !compatible {
            return Err(PageError::FieldKind {
                field: name.to_string(),
                expected: spec.kind,
                found: setter,
            });
        }
        Ok((i, spec))
    }

    fn put(mut self, i: usize, value: ParamValue) -> Self {
        self.values[i] = Some(value);
        self
    }
}

/// Immutable, validated parameters for one render or build call.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
    entries: Vec<(&'static str, ParamValue)>,
    branch: Option<SolverBranch>,
}

impl ParameterRecord {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_text)
    }

    pub fn triple(&self, name: &str) -> Option<[f64; 3]> {
        self.get(name).and_then(ParamValue::as_triple)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn branch(&self) -> Option<SolverBranch> {
        self.branch
    }

    /// Replay the record onto an external builder in declaration order.
    pub fn apply<B: ParamsBuilder + ?Sized>(&self, builder: &B) -> Result<B::Params, ModelError> {
        let mut params = builder.builder()?;
        for (name, value) in &self.entries {
            params = builder.set(params, name, value)?;
        }
        Ok(params)
    }
}

/// Capability for the external module's `Params.builder()` chain.
pub trait ParamsBuilder {
    type Params;

    fn builder(&self) -> Result<Self::Params, ModelError>;

    fn set(
        &self,
        params: Self::Params,
        field: &str,
        value: &ParamValue,
    ) -> Result<Self::Params, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automaton_schema() -> ParamSchema {
        ParamSchema::new(vec![
            FieldSpec::integer("max_time").with_fallback(100.0),
            FieldSpec::integer("resolution"),
            FieldSpec::enumerated("boundary"),
            FieldSpec::integer("rule").clamped(0.0, 255.0),
        ])
    }

    fn solver_schema() -> ParamSchema {
        ParamSchema::new(vec![
            FieldSpec::seed("ssa_seed").only_for(SolverBranch::Stochastic),
            FieldSpec::enumerated("solver").only_for(SolverBranch::Ode),
            FieldSpec::float("max_time"),
        ])
    }

    #[test]
    fn parses_like_browser_number() {
        assert_eq!(parse_js_number("42"), Some(42.0));
        assert_eq!(parse_js_number("  1.5e2 "), Some(150.0));
        assert_eq!(parse_js_number(".5"), Some(0.5));
        assert_eq!(parse_js_number("-3"), Some(-3.0));
        assert_eq!(parse_js_number(""), Some(0.0));
        assert_eq!(parse_js_number("   "), Some(0.0));
        assert_eq!(parse_js_number("0x1F"), Some(31.0));
        assert_eq!(parse_js_number("0b101"), Some(5.0));
        assert_eq!(parse_js_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_js_number("abc"), None);
        assert_eq!(parse_js_number("inf"), None);
        assert_eq!(parse_js_number("NaN"), None);
        assert_eq!(parse_js_number("12px"), None);
        assert_eq!(parse_js_number("0x"), None);
        assert_eq!(parse_js_number("0x+5"), None);
    }

    #[test]
    fn rule_is_clamped_not_rejected() {
        let schema = automaton_schema();
        let record = schema
            .builder(CoercionPolicy::Reject)
            .number("max_time", "100")
            .unwrap()
            .number("resolution", "64")
            .unwrap()
            .text("boundary", "periodic")
            .unwrap()
            .number("rule", "300")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(record.number("rule"), Some(255.0));

        let low = schema
            .builder(CoercionPolicy::Reject)
            .number("rule", "-4")
            .unwrap();
        let low = low
            .number("max_time", "1")
            .unwrap()
            .number("resolution", "1")
            .unwrap()
            .text("boundary", "fixed")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(low.number("rule"), Some(0.0));
    }

    #[test]
    fn integer_fields_truncate_after_clamp() {
        let spec = FieldSpec::integer("rule").clamped(0.0, 255.0);
        assert_eq!(spec.normalize(30.9), 30.0);
        assert_eq!(spec.normalize(f64::NAN), 0.0);
        assert_eq!(spec.normalize(f64::INFINITY), 255.0);
    }

    #[test]
    fn record_contains_exactly_declared_fields_in_order() {
        let schema = automaton_schema();
        let record = schema
            .builder(CoercionPolicy::Fallback)
            .text("boundary", "fixed")
            .unwrap()
            .number("rule", "30")
            .unwrap()
            .number("resolution", "100")
            .unwrap()
            .number("max_time", "50")
            .unwrap()
            .build()
            .unwrap();
        let names: Vec<_> = record.names().collect();
        assert_eq!(names, vec!["max_time", "resolution", "boundary", "rule"]);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn missing_and_unknown_fields_are_errors() {
        let schema = automaton_schema();
        let err = schema
            .builder(CoercionPolicy::Fallback)
            .number("max_time", "1")
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            PageError::MissingField {
                field: "resolution".to_string()
            }
        );

        let err = schema
            .builder(CoercionPolicy::Fallback)
            .number("seed", "1")
            .unwrap_err();
        assert!(matches!(err, PageError::UnknownField { .. }));
    }

    #[test]
    fn setter_kind_must_match_field_kind() {
        let schema = automaton_schema();
        let err = schema
            .builder(CoercionPolicy::Fallback)
            .text("rule", "30")
            .unwrap_err();
        assert_eq!(
            err,
            PageError::FieldKind {
                field: "rule".to_string(),
                expected: FieldKind::Integer,
                found: FieldKind::Enum,
            }
        );
    }

    #[test]
    fn coercion_policies_are_explicit() {
        let schema = automaton_schema();

        let fallback = schema
            .builder(CoercionPolicy::Fallback)
            .number("max_time", "oops")
            .unwrap();
        let passthrough = schema
            .builder(CoercionPolicy::Passthrough)
            .number("max_time", "oops")
            .unwrap();
        let reject = schema
            .builder(CoercionPolicy::Reject)
            .number("max_time", "oops");

        let finish = |b: ParamBuilder<'_>| {
            b.number("resolution", "1")
                .and_then(|b| b.text("boundary", "x"))
                .and_then(|b| b.number("rule", "1"))
                .and_then(|b| b.build())
                .unwrap()
        };
        assert_eq!(finish(fallback).number("max_time"), Some(100.0));
        assert!(finish(passthrough).number("max_time").unwrap().is_nan());
        assert!(matches!(reject, Err(PageError::InvalidNumber { .. })));
    }

    #[test]
    fn solver_branches_are_mutually_exclusive() {
        let schema = solver_schema();

        let ssa = schema
            .builder(CoercionPolicy::Fallback)
            .branch(SolverBranch::Stochastic)
            .seed("ssa_seed", "1234")
            .unwrap()
            .number("max_time", "10")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(ssa.text("ssa_seed"), Some("1234"));
        assert!(ssa.get("solver").is_none());

        let ode = schema
            .builder(CoercionPolicy::Fallback)
            .branch(SolverBranch::Ode)
            .text("solver", "rk4")
            .unwrap()
            .number("max_time", "10")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(ode.text("solver"), Some("rk4"));
        assert!(ode.get("ssa_seed").is_none());

        let both = schema
            .builder(CoercionPolicy::Fallback)
            .branch(SolverBranch::Ode)
            .text("solver", "rk4")
            .unwrap()
            .seed("ssa_seed", "1")
            .unwrap()
            .number("max_time", "10")
            .unwrap()
            .build();
        assert_eq!(
            both,
            Err(PageError::UnexpectedField {
                field: "ssa_seed".to_string()
            })
        );
    }

    #[test]
    fn triples_bind_three_numbers() {
        let schema = ParamSchema::new(vec![FieldSpec::triple("initial_state")]);
        let record = schema
            .builder(CoercionPolicy::Fallback)
            .triple("initial_state", ["1", "2", "x"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(record.triple("initial_state"), Some([1.0, 2.0, 0.0]));
    }

    struct RecordingBuilder;

    impl ParamsBuilder for RecordingBuilder {
        type Params = Vec<String>;

        fn builder(&self) -> Result<Self::Params, ModelError> {
            Ok(Vec::new())
        }

        fn set(
            &self,
            mut params: Self::Params,
            field: &str,
            value: &ParamValue,
        ) -> Result<Self::Params, ModelError> {
            let v = match value {
                ParamValue::Number(n) => n.to_string(),
                ParamValue::Text(s) => s.clone(),
                ParamValue::Triple(t) => format!("{t:?}"),
            };
            params.push(format!("{field}={v}"));
            Ok(params)
        }
    }

    #[test]
    fn apply_replays_in_declaration_order() {
        let schema = automaton_schema();
        let record = schema
            .builder(CoercionPolicy::Fallback)
            .number("rule", "90")
            .unwrap()
            .text("boundary", "periodic")
            .unwrap()
            .number("resolution", "8")
            .unwrap()
            .number("max_time", "4")
            .unwrap()
            .build()
            .unwrap();
        let calls = record.apply(&RecordingBuilder).unwrap();
        assert_eq!(
            calls,
            vec!["max_time=4", "resolution=8", "boundary=periodic", "rule=90"]
        );
    }
}

//! Predicate trees.
//!
//! A [`Predicate`] renders itself to a boolean SQL fragment and binds its
//! values into the caller's [`Parameters`]. Field references are resolved
//! against the mapping of the statement being generated.
//!
//! Bound names have the shape `<prefix><Property>_p<n>`. They only meet the
//! generator's SET placeholders when a mapped property itself ends in `_p<n>`;
//! UPDATE reports that case as a duplicate parameter.

use std::fmt;

use crate::error::SqlGenResult;
use crate::generator::SqlGenerator;
use crate::mapping::TableMap;
use crate::params::Parameters;
use crate::value::SqlValue;

/// A composable boolean expression.
pub trait Predicate: fmt::Debug + Send + Sync {
    /// Render to SQL, appending bound values to `params`.
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String>;

    fn boxed(self) -> Box<dyn Predicate>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<P: Predicate + ?Sized> Predicate for Box<P> {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        (**self).to_sql(generator, map, params)
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl Operator {
    /// SQL operator, inverted when `not` is set.
    pub fn sql(self, not: bool) -> &'static str {
        match (self, not) {
            (Operator::Eq, false) => "=",
            (Operator::Eq, true) => "<>",
            (Operator::Gt, false) => ">",
            (Operator::Gt, true) => "<=",
            (Operator::Ge, false) => ">=",
            (Operator::Ge, true) => "<",
            (Operator::Lt, false) => "<",
            (Operator::Lt, true) => ">=",
            (Operator::Le, false) => "<=",
            (Operator::Le, true) => ">",
            (Operator::Like, false) => "LIKE",
            (Operator::Like, true) => "NOT LIKE",
        }
    }
}

fn bind(
    generator: &SqlGenerator,
    params: &mut Parameters,
    property: &str,
    value: &SqlValue,
) -> SqlGenResult<String> {
    params.push(generator.dialect().parameter_prefix(), property, value.clone())
}

fn not_kw(not: bool) -> &'static str {
    if not { "NOT " } else { "" }
}

/// `column <op> value`, or `column IS [NOT] NULL` for a null value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub property: String,
    pub op: Operator,
    pub value: SqlValue,
    pub not: bool,
}

impl Predicate for FieldPredicate {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let column = generator.column_name_of(map, &self.property, false)?;
        if self.value.is_null() {
            return Ok(format!("{} IS {}NULL", column, not_kw(self.not)));
        }
        let param = bind(generator, params, &self.property, &self.value)?;
        Ok(format!("{} {} {}", column, self.op.sql(self.not), param))
    }
}

/// Compares two columns of the same mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPredicate {
    pub left: String,
    pub op: Operator,
    pub right: String,
    pub not: bool,
}

impl Predicate for ColumnPredicate {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        _params: &mut Parameters,
    ) -> SqlGenResult<String> {
        Ok(format!(
            "{} {} {}",
            generator.column_name_of(map, &self.left, false)?,
            self.op.sql(self.not),
            generator.column_name_of(map, &self.right, false)?
        ))
    }
}

/// `column [NOT] IN (...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InPredicate {
    pub property: String,
    pub values: Vec<SqlValue>,
    pub not: bool,
}

impl Predicate for InPredicate {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let column = generator.column_name_of(map, &self.property, false)?;
        if self.values.is_empty() {
            // Nothing is in an empty set.
            return Ok(if self.not {
                generator.dialect().empty_expression().to_string()
            } else {
                "1=0".to_string()
            });
        }
        let names = self
            .values
            .iter()
            .map(|v| bind(generator, params, &self.property, v))
            .collect::<SqlGenResult<Vec<_>>>()?;
        Ok(format!("{} {}IN ({})", column, not_kw(self.not), names.join(", ")))
    }
}

/// `(column [NOT] BETWEEN low AND high)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BetweenPredicate {
    pub property: String,
    pub low: SqlValue,
    pub high: SqlValue,
    pub not: bool,
}

impl Predicate for BetweenPredicate {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let column = generator.column_name_of(map, &self.property, false)?;
        let low = bind(generator, params, &self.property, &self.low)?;
        let high = bind(generator, params, &self.property, &self.high)?;
        Ok(format!("({} {}BETWEEN {} AND {})", column, not_kw(self.not), low, high))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperator {
    And,
    Or,
}

/// Parenthesised AND/OR over child predicates.
#[derive(Debug)]
pub struct PredicateGroup {
    pub op: GroupOperator,
    pub predicates: Vec<Box<dyn Predicate>>,
}

impl Predicate for PredicateGroup {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        if self.predicates.is_empty() {
            return Ok(generator.dialect().empty_expression().to_string());
        }
        let joiner = match self.op {
            GroupOperator::And => " AND ",
            GroupOperator::Or => " OR ",
        };
        let parts = self
            .predicates
            .iter()
            .map(|p| p.to_sql(generator, map, params))
            .collect::<SqlGenResult<Vec<_>>>()?;
        Ok(format!("({})", parts.join(joiner)))
    }
}

/// `NOT (<inner>)`.
#[derive(Debug)]
pub struct NotPredicate {
    pub predicate: Box<dyn Predicate>,
}

impl Predicate for NotPredicate {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        Ok(format!("NOT ({})", self.predicate.to_sql(generator, map, params)?))
    }
}

/// `[NOT] EXISTS (SELECT 1 FROM <other> WHERE ...)`, correlated on another mapping.
#[derive(Debug)]
pub struct ExistsPredicate {
    pub map: TableMap,
    pub predicate: Box<dyn Predicate>,
    pub not: bool,
}

impl Predicate for ExistsPredicate {
    fn to_sql(
        &self,
        generator: &SqlGenerator,
        _map: &TableMap,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        Ok(format!(
            "{}EXISTS (SELECT 1 FROM {} WHERE {})",
            not_kw(self.not),
            generator.table_name(&self.map)?,
            self.predicate.to_sql(generator, &self.map, params)?
        ))
    }
}

pub fn field(
    property: impl Into<String>,
    op: Operator,
    value: impl Into<SqlValue>,
) -> FieldPredicate {
    FieldPredicate {
        property: property.into(),
        op,
        value: value.into(),
        not: false,
    }
}

pub fn not_field(
    property: impl Into<String>,
    op: Operator,
    value: impl Into<SqlValue>,
) -> FieldPredicate {
    FieldPredicate {
        not: true,
        ..field(property, op, value)
    }
}

pub fn column(left: impl Into<String>, op: Operator, right: impl Into<String>) -> ColumnPredicate {
    ColumnPredicate {
        left: left.into(),
        op,
        right: right.into(),
        not: false,
    }
}

pub fn is_in<V: Into<SqlValue>>(
    property: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> InPredicate {
    InPredicate {
        property: property.into(),
        values: values.into_iter().map(Into::into).collect(),
        not: false,
    }
}

pub fn between(
    property: impl Into<String>,
    low: impl Into<SqlValue>,
    high: impl Into<SqlValue>,
) -> BetweenPredicate {
    BetweenPredicate {
        property: property.into(),
        low: low.into(),
        high: high.into(),
        not: false,
    }
}

pub fn and(predicates: impl IntoIterator<Item = Box<dyn Predicate>>) -> PredicateGroup {
    PredicateGroup {
        op: GroupOperator::And,
        predicates: predicates.into_iter().collect(),
    }
}

pub fn or(predicates: impl IntoIterator<Item = Box<dyn Predicate>>) -> PredicateGroup {
    PredicateGroup {
        op: GroupOperator::Or,
        predicates: predicates.into_iter().collect(),
    }
}

pub fn not(predicate: impl Predicate + 'static) -> NotPredicate {
    NotPredicate {
        predicate: Box::new(predicate),
    }
}

pub fn exists(map: TableMap, predicate: impl Predicate + 'static) -> ExistsPredicate {
    ExistsPredicate {
        map,
        predicate: Box::new(predicate),
        not: false,
    }
}

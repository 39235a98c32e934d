//! Arithmetic and string expression trees

/// Reference to a feature or to one of its attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarRef {
    /// A feature; evaluates to its selection variable as 0/1
    Feature(String),
    /// An attribute of a feature; evaluates to the companion variable
    Attribute {
        /// Identifier of the declaring feature
        feature: String,
        /// Name of the attribute
        attribute: String,
    },
}

impl VarRef {
    /// Reference to a feature's selection value
    pub fn feature(id: impl Into<String>) -> Self {
        VarRef::Feature(id.into())
    }

    /// Reference to an attribute of a feature
    pub fn attribute(feature: impl Into<String>, attribute: impl Into<String>) -> Self {
        VarRef::Attribute {
            feature: feature.into(),
            attribute: attribute.into(),
        }
    }
}

/// An expression that evaluates to an integer or string term
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Addition
    Add(Box<Expression>, Box<Expression>),
    /// Subtraction
    Sub(Box<Expression>, Box<Expression>),
    /// Multiplication
    Mul(Box<Expression>, Box<Expression>),
    /// Truncating division
    Div(Box<Expression>, Box<Expression>),
    /// Integer literal
    Number(i32),
    /// String literal; valid only inside a string equality
    Str(String),
    /// Reference to a feature or attribute
    Ref(VarRef),
    /// Sum of an attribute over all declaring features
    Sum {
        /// Name of the aggregated attribute
        attribute: String,
    },
    /// Average of an attribute over the selected declaring features
    Avg {
        /// Name of the aggregated attribute
        attribute: String,
    },
    /// Length of an externally tracked value, as variable `<ref>-len`
    Length {
        /// Identifier of the referenced value
        reference: String,
    },
}

impl Expression {
    /// Integer literal
    pub fn number(value: i32) -> Self {
        Expression::Number(value)
    }

    /// String literal
    pub fn string(value: impl Into<String>) -> Self {
        Expression::Str(value.into())
    }

    /// Reference to a feature's selection value
    pub fn feature(id: impl Into<String>) -> Self {
        Expression::Ref(VarRef::feature(id))
    }

    /// Reference to an attribute of a feature
    pub fn attribute(feature: impl Into<String>, attribute: impl Into<String>) -> Self {
        Expression::Ref(VarRef::attribute(feature, attribute))
    }

    /// Sum aggregate over an attribute name
    pub fn sum(attribute: impl Into<String>) -> Self {
        Expression::Sum {
            attribute: attribute.into(),
        }
    }

    /// Average aggregate over an attribute name
    pub fn avg(attribute: impl Into<String>) -> Self {
        Expression::Avg {
            attribute: attribute.into(),
        }
    }

    /// Length aggregate over a reference
    pub fn length(reference: impl Into<String>) -> Self {
        Expression::Length {
            reference: reference.into(),
        }
    }

    /// Addition
    pub fn add(self, other: Expression) -> Self {
        Expression::Add(Box::new(self), Box::new(other))
    }

    /// Subtraction
    pub fn sub(self, other: Expression) -> Self {
        Expression::Sub(Box::new(self), Box::new(other))
    }

    /// Multiplication
    pub fn mul(self, other: Expression) -> Self {
        Expression::Mul(Box::new(self), Box::new(other))
    }

    /// Truncating division
    pub fn div(self, other: Expression) -> Self {
        Expression::Div(Box::new(self), Box::new(other))
    }
}

//! Operator dispatch table.
//!
//! Every operator the keypad knows is a variant of [`Operator`] backed by one
//! row in [`OPERATORS`]. Adding a function means adding a variant and a row;
//! nothing else in the engine branches on individual operators except the
//! sign-flip shortcut in the calculator.

use crate::error::CalcError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Equals,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Log,
    Ln,
    Sqrt,
    Square,
    Cube,
    Reciprocal,
    Percent,
    Factorial,
    Negate,
    Pi,
    Pow10,
    Exp,
}

/// How an operator uses the accumulator and the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// Combines the accumulator with the operand.
    Binary,
    /// Depends on the operand only.
    Unary,
    /// Ignores both.
    Constant,
}

/// One row of the dispatch table.
pub struct OperatorDef {
    pub operator: Operator,
    /// Glyph shown on the button and in the history trail.
    pub symbol: &'static str,
    /// Keyboard-friendly spellings accepted by [`Operator::from_str`].
    pub aliases: &'static [&'static str],
    pub kind: OperatorKind,
    /// `(accumulator, operand) -> new accumulator`
    pub eval: fn(f64, f64) -> f64,
}

/// Rows are in declaration order of [`Operator`].
pub static OPERATORS: [OperatorDef; 25] = [
    OperatorDef {
        operator: Operator::Add,
        symbol: "+",
        aliases: &["add"],
        kind: OperatorKind::Binary,
        eval: |acc, x| acc + x,
    },
    OperatorDef {
        operator: Operator::Subtract,
        symbol: "−",
        aliases: &["-", "sub"],
        kind: OperatorKind::Binary,
        eval: |acc, x| acc - x,
    },
    OperatorDef {
        operator: Operator::Multiply,
        symbol: "×",
        aliases: &["*", "x", "mul"],
        kind: OperatorKind::Binary,
        eval: |acc, x| acc * x,
    },
    OperatorDef {
        operator: Operator::Divide,
        symbol: "÷",
        aliases: &["/", "div"],
        kind: OperatorKind::Binary,
        eval: |acc, x| acc / x,
    },
    OperatorDef {
        operator: Operator::Modulo,
        symbol: "mod",
        aliases: &[],
        kind: OperatorKind::Binary,
        eval: |acc, x| acc % x,
    },
    OperatorDef {
        operator: Operator::Power,
        symbol: "xʸ",
        aliases: &["x^y", "^", "pow"],
        kind: OperatorKind::Binary,
        eval: f64::powf,
    },
    OperatorDef {
        operator: Operator::Equals,
        symbol: "=",
        aliases: &[],
        kind: OperatorKind::Binary,
        eval: |_, x| x,
    },
    OperatorDef {
        operator: Operator::Sin,
        symbol: "sin",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.to_radians().sin(),
    },
    OperatorDef {
        operator: Operator::Cos,
        symbol: "cos",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.to_radians().cos(),
    },
    OperatorDef {
        operator: Operator::Tan,
        symbol: "tan",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.to_radians().tan(),
    },
    OperatorDef {
        operator: Operator::Sinh,
        symbol: "sinh",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.sinh(),
    },
    OperatorDef {
        operator: Operator::Cosh,
        symbol: "cosh",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.cosh(),
    },
    OperatorDef {
        operator: Operator::Tanh,
        symbol: "tanh",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.tanh(),
    },
    OperatorDef {
        operator: Operator::Log,
        symbol: "log",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.log10(),
    },
    OperatorDef {
        operator: Operator::Ln,
        symbol: "ln",
        aliases: &[],
        kind: OperatorKind::Unary,
        eval: |_, x| x.ln(),
    },
    OperatorDef {
        operator: Operator::Sqrt,
        symbol: "√",
        aliases: &["sqrt"],
        kind: OperatorKind::Unary,
        eval: |_, x| x.sqrt(),
    },
    OperatorDef {
        operator: Operator::Square,
        symbol: "x²",
        aliases: &["x^2", "sq"],
        kind: OperatorKind::Unary,
        eval: |_, x| x * x,
    },
    OperatorDef {
        operator: Operator::Cube,
        symbol: "x³",
        aliases: &["x^3", "cube"],
        kind: OperatorKind::Unary,
        eval: |_, x| x * x * x,
    },
    OperatorDef {
        operator: Operator::Reciprocal,
        symbol: "1/x",
        aliases: &["inv"],
        kind: OperatorKind::Unary,
        eval: |_, x| 1.0 / x,
    },
    OperatorDef {
        operator: Operator::Percent,
        symbol: "%",
        aliases: &["pct"],
        kind: OperatorKind::Unary,
        eval: |_, x| x / 100.0,
    },
    OperatorDef {
        operator: Operator::Factorial,
        symbol: "n!",
        aliases: &["!", "fact"],
        kind: OperatorKind::Unary,
        eval: |_, x| factorial(x),
    },
    OperatorDef {
        operator: Operator::Negate,
        symbol: "±",
        aliases: &["+/-", "neg"],
        kind: OperatorKind::Unary,
        eval: |_, x| -x,
    },
    OperatorDef {
        operator: Operator::Pi,
        symbol: "π",
        aliases: &["pi"],
        kind: OperatorKind::Constant,
        eval: |_, _| std::f64::consts::PI,
    },
    OperatorDef {
        operator: Operator::Pow10,
        symbol: "10ˣ",
        aliases: &["10^x"],
        kind: OperatorKind::Unary,
        eval: |_, x| pow10(x),
    },
    OperatorDef {
        operator: Operator::Exp,
        symbol: "eˣ",
        aliases: &["e^x", "exp"],
        kind: OperatorKind::Unary,
        eval: |_, x| x.exp(),
    },
];

/// `10^x`, exact to the nearest double for whole exponents.
pub fn pow10(x: f64) -> f64 {
    if x.fract() == 0.0 && x.abs() <= 400.0 {
        // "1e23" parses to the double nearest 10^23; powf can land one ulp off.
        if let Ok(v) = format!("1e{}", x as i32).parse() {
            return v;
        }
    }
    10f64.powf(x)
}

/// Largest n whose factorial is finite in an `f64`.
const MAX_FACTORIAL: f64 = 170.0;

/// `floor(x)!` as an iterative product.
///
/// Negative and NaN inputs give NaN; anything past 170 overflows to infinity.
pub fn factorial(x: f64) -> f64 {
    if x.is_nan() || x < 0.0 {
        return f64::NAN;
    }
    let n = x.floor();
    if n > MAX_FACTORIAL {
        return f64::INFINITY;
    }
    (1..=n as u32).fold(1.0, |acc, i| acc * f64::from(i))
}

impl Operator {
    pub fn def(self) -> &'static OperatorDef {
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.def().symbol
    }

    pub fn kind(self) -> OperatorKind {
        self.def().kind
    }

    /// Combine the accumulator with a freshly entered operand.
    pub fn apply(self, accumulator: f64, operand: f64) -> f64 {
        (self.def().eval)(accumulator, operand)
    }

    pub fn all() -> impl Iterator<Item = Operator> {
        OPERATORS.iter().map(|d| d.operator)
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OPERATORS
            .iter()
            .find(|d| d.symbol == s || d.aliases.contains(&s))
            .map(|d| d.operator)
            .ok_or_else(|| CalcError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Operators of the addition class (`+`, `-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionOp {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
}

/// Operators of the multiplication class (`*`, `/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplicationOp {
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
}

impl AdditionOp {
    pub fn symbol(self) -> char {
        match self {
            AdditionOp::Add => '+',
            AdditionOp::Subtract => '-',
        }
    }
}

impl MultiplicationOp {
    pub fn symbol(self) -> char {
        match self {
            MultiplicationOp::Multiply => '*',
            MultiplicationOp::Divide => '/',
        }
    }
}

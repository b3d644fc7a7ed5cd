pub use context::{Context, GraphicsContext};
pub use operator::{Operator, OperatorInfo, Transition};

mod context;
mod operator;

/// Runtime values.
///
/// Defines the `Value` enum used for every result the interpreter produces,
/// together with checked accessors that turn a wrongly typed value into a
/// `RuntimeError` pointing at the offending token.
pub mod core;
/// The variable store.
///
/// A slot map of `Variable` bindings addressed by generation-checked
/// `VarHandle`s, with the depth-based visibility and pruning rules scopes
/// rely on.
pub mod variables;

pub use self::{
    core::Value,
    variables::{VarHandle, Variable, Variables},
};

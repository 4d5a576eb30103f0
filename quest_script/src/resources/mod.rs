//! Typed resources built from parsed nodes.
//!
//! Every resource knows two spans: [`QuestResource::range`], the part a
//! reader points at (a name, an id), and [`QuestResource::block_range`], the
//! whole construct including any lines it owns. The first is always inside
//! the second.

mod action;
mod collection;
mod directive;
mod message;
mod symbol;
mod task;

pub use action::Action;
pub use collection::{Definitions, OneOrMany};
pub use directive::Directive;
pub use message::Message;
pub use symbol::{Symbol, SymbolVariation, symbol_variations};
pub use task::Task;

use crate::signature::Parameter;
use crate::text::{Position, QuestToken, Range};

pub trait QuestResource {
    fn range(&self) -> Range;

    fn block_range(&self) -> Range;
}

/// A resource whose words were typed by a signature template.
///
/// `parameters()[i]` was read from `parameter_tokens()[i]`.
pub trait Parameterized {
    fn parameters(&self) -> &[Parameter];

    fn parameter_tokens(&self) -> &[QuestToken];

    /// Source range of the `index`-th parameter.
    ///
    /// # Panics
    /// Panics if `index` is not a valid parameter index.
    fn parameter_range(&self, index: usize) -> Range {
        let count = self.parameters().len();
        assert!(index < count, "parameter index {index} out of bounds ({count} parameters)");
        self.parameter_tokens()[index].range()
    }

    /// Range of the first parameter whose value is `value`.
    fn parameter_range_by_value(&self, value: &str) -> Option<Range> {
        self.parameters()
            .iter()
            .position(|parameter| parameter.value == value)
            .map(|index| self.parameter_range(index))
    }

    /// The parameter under `position`, with its index.
    fn parameter_at(&self, position: Position) -> Option<(usize, &Parameter)> {
        self.parameter_tokens()
            .iter()
            .zip(self.parameters())
            .enumerate()
            .find(|(_, (token, _))| token.range().contains(position))
            .map(|(index, (_, parameter))| (index, parameter))
    }

    /// Each parameter with its index and source range.
    fn parameters_with_ranges(&self) -> Vec<(usize, &Parameter, Range)> {
        self.parameter_tokens()
            .iter()
            .zip(self.parameters())
            .enumerate()
            .map(|(index, (token, parameter))| (index, parameter, token.range()))
            .collect()
    }
}

use crate::interpreter::{
    semantic::symbols::{DataType, Symbol},
    value::Value,
};

/// A stable reference to a binding in [`Variables`].
///
/// Handles stay valid while the binding lives; once it is pruned, the
/// generation check makes every old handle resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarHandle {
    index:      usize,
    generation: u32,
}

/// A named runtime binding and the block depth it was created at.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name:  String,
    pub value: Value,
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entry:      Option<Variable>,
}

/// Slot-map storage for every live variable.
///
/// A binding is visible while the current depth is at least its own depth.
/// Pruning happens when blocks close, so at most one binding per name is
/// ever visible.
///
/// # Example
/// ```
/// use kmsl::interpreter::value::{Value, Variables};
///
/// let mut vars = Variables::default();
/// let x = vars.assign("x", Value::Int(1), 1);
/// vars.assign("x", Value::Int(2), 2);
///
/// assert_eq!(vars.get(x).map(|v| &v.value), Some(&Value::Int(2)));
/// assert!(vars.lookup("x", 0).is_none());
///
/// vars.prune_deeper_than(0);
/// assert!(vars.get(x).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Variables {
    slots: Vec<Slot>,
    free:  Vec<usize>,
}

impl Variables {
    /// Finds the binding called `name` visible at `depth`.
    #[must_use]
    pub fn lookup(&self, name: &str, depth: usize) -> Option<VarHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.entry.as_ref().map(|entry| (index, slot, entry)))
            .filter(|(_, _, entry)| entry.name == name && entry.depth <= depth)
            .max_by_key(|(_, _, entry)| entry.depth)
            .map(|(index, slot, _)| VarHandle { index,
                                                generation: slot.generation })
    }

    #[must_use]
    pub fn get(&self, handle: VarHandle) -> Option<&Variable> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, handle: VarHandle) -> Option<&mut Variable> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    /// Creates a new binding at `depth`.
    pub fn declare(&mut self, name: &str, value: Value, depth: usize) -> VarHandle {
        let entry = Variable { name: name.to_string(),
                               value,
                               depth };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.entry = Some(entry);
            return VarHandle { index,
                               generation: slot.generation };
        }
        self.slots.push(Slot { generation: 0,
                               entry:      Some(entry), });
        VarHandle { index:      self.slots.len() - 1,
                    generation: 0, }
    }

    /// Updates the binding visible at `depth`, or creates one there.
    pub fn assign(&mut self, name: &str, value: Value, depth: usize) -> VarHandle {
        if let Some(handle) = self.lookup(name, depth)
           && let Some(variable) = self.get_mut(handle)
        {
            variable.value = value;
            return handle;
        }
        self.declare(name, value, depth)
    }

    /// Removes every binding deeper than `depth`.
    pub fn prune_deeper_than(&mut self, depth: usize) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.as_ref().is_some_and(|entry| entry.depth > depth) {
                slot.entry = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
    }

    /// Live bindings, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.slots.iter().filter_map(|slot| slot.entry.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Describes the bindings visible at `depth` as analyzer symbols.
    #[must_use]
    pub fn symbols(&self, depth: usize) -> Vec<Symbol> {
        self.iter()
            .filter(|variable| variable.depth <= depth)
            .map(|variable| Symbol::new(variable.name.clone(),
                                        DataType::of_value(&variable.value),
                                        variable.depth))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deeper_bindings_shadow_until_pruned() {
        let mut vars = Variables::default();
        vars.declare("n", Value::Int(1), 1);
        let inner = vars.declare("n", Value::Int(2), 3);

        assert_eq!(vars.lookup("n", 2).and_then(|h| vars.get(h)).map(|v| v.depth), Some(1));
        assert_eq!(vars.lookup("n", 3), Some(inner));

        vars.prune_deeper_than(2);
        assert!(vars.get(inner).is_none());
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn freed_slots_are_reused_with_a_new_generation() {
        let mut vars = Variables::default();
        let old = vars.declare("a", Value::Bool(true), 2);
        vars.prune_deeper_than(1);

        let new = vars.declare("b", Value::from("s"), 2);
        assert_ne!(old, new);
        assert!(vars.get(old).is_none());
        assert_eq!(vars.get(new).map(|v| v.name.as_str()), Some("b"));
    }

    #[test]
    fn symbols_reflect_runtime_types() {
        let mut vars = Variables::default();
        vars.declare("f", Value::Float(0.5), 1);
        vars.declare("deep", Value::Int(0), 4);

        assert_eq!(vars.symbols(1), [Symbol::new("f", DataType::Float, 1)]);
    }
}

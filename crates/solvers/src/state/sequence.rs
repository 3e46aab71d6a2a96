use super::StateError;

/// A state object that becomes read-only once finalized.
pub trait Finalize {
    /// Finalizes this state and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if called twice.
    fn finalize(&mut self) -> Result<(), StateError>;

    fn is_finalized(&self) -> bool;
}

/// An ordered sequence of states with a cursor.
///
/// The cursor marks the current state. Cursor-relative accessors return
/// `None` at the sequence boundaries instead of failing. Finalizing the
/// sequence finalizes every child and moves the cursor back to the start so
/// the finalized states can be walked again for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSequence<T> {
    states: Vec<T>,
    cursor: usize,
    finalized: bool,
}

impl<T> Default for StateSequence<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> StateSequence<T> {
    #[must_use]
    pub fn new(states: Vec<T>) -> Self {
        Self {
            states,
            cursor: 0,
            finalized: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.states.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.states
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.states.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.states.get_mut(index)
    }

    /// Appends a state and moves the cursor onto it.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if the sequence is finalized.
    pub fn push(&mut self, state: T) -> Result<&mut T, StateError> {
        if self.finalized {
            return Err(StateError::AlreadyFinalized("state sequence"));
        }
        self.states.push(state);
        self.cursor = self.states.len() - 1;
        Ok(&mut self.states[self.cursor])
    }

    /// Moves the cursor forward and returns its new position.
    ///
    /// Returns `None` and leaves the cursor unchanged at the last state.
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.next_index()?;
        self.cursor = next;
        Some(next)
    }

    /// Moves the cursor to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::MissingState`] if `index` is out of bounds.
    pub fn seek(&mut self, index: usize) -> Result<(), StateError> {
        if index >= self.states.len() {
            return Err(StateError::MissingState(index));
        }
        self.cursor = index;
        Ok(())
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        (self.cursor < self.states.len()).then_some(self.cursor)
    }

    #[must_use]
    pub fn previous_index(&self) -> Option<usize> {
        self.current_index()?.checked_sub(1)
    }

    #[must_use]
    pub fn next_index(&self) -> Option<usize> {
        let next = self.current_index()? + 1;
        (next < self.states.len()).then_some(next)
    }

    #[must_use]
    pub fn first_index(&self) -> Option<usize> {
        (!self.states.is_empty()).then_some(0)
    }

    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.states.len().checked_sub(1)
    }

    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.states.get(self.current_index()?)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        let index = self.current_index()?;
        self.states.get_mut(index)
    }

    #[must_use]
    pub fn previous(&self) -> Option<&T> {
        self.states.get(self.previous_index()?)
    }

    #[must_use]
    pub fn next(&self) -> Option<&T> {
        self.states.get(self.next_index()?)
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.states.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.states.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.states.last_mut()
    }

    /// Splits off the last state mutably from the read-only states before it.
    pub fn split_last_mut(&mut self) -> Option<(&mut T, &[T])> {
        self.states
            .split_last_mut()
            .map(|(last, rest)| (last, &*rest))
    }
}

impl<T: Finalize> Finalize for StateSequence<T> {
    fn finalize(&mut self) -> Result<(), StateError> {
        if self.finalized {
            return Err(StateError::AlreadyFinalized("state sequence"));
        }
        for state in &mut self.states {
            if !state.is_finalized() {
                state.finalize()?;
            }
        }
        self.finalized = true;
        self.reset_cursor();
        Ok(())
    }

    fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl<'a, T> IntoIterator for &'a StateSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Local view of a transport. A transport only goes from `Open` to `Closed`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConnectionState {
  /// Reads and writes are allowed.
  #[default]
  Open,
  /// Nothing can be transferred anymore. The peer may not know yet.
  Closed,
}

impl ConnectionState {
  /// Moves to [`ConnectionState::Closed`]. Returns `true` if this call performed the transition.
  #[inline]
  pub fn close(&mut self) -> bool {
    let was_open = self.is_open();
    *self = Self::Closed;
    was_open
  }

  /// Shortcut for [`ConnectionState::Open`].
  #[inline]
  pub fn is_open(self) -> bool {
    matches!(self, Self::Open)
  }

  /// Returns `err` if closed.
  #[inline]
  pub fn ensure_open(self, err: crate::Error) -> crate::Result<()> {
    if self.is_open() {
      Ok(())
    } else {
      Err(err)
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::misc::ConnectionState;

  #[test]
  fn closing_happens_once() {
    let mut state = ConnectionState::default();
    assert!(state.ensure_open(crate::Error::UnexpectedStreamReadEOF).is_ok());
    assert!(state.close());
    assert!(!state.close());
    assert!(matches!(
      state.ensure_open(crate::Error::UnexpectedStreamWriteEOF),
      Err(crate::Error::UnexpectedStreamWriteEOF)
    ));
  }
}

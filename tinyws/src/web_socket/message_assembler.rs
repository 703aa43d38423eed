use crate::web_socket::{FragmentsPolicy, Frame, Message, MessageKind, MessageRole, WebSocketError};
use alloc::vec::Vec;

/// State of the fragmented message that is being received.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamState {
  /// No fragmented message is in progress.
  Empty,
  /// The first fragment arrived, more are expected.
  Open,
  /// The last fragment arrived. Internal to [`MessageAssembler::on_frame`], which resets the
  /// builder before returning, so [`MessageAssembler::state`] never yields it.
  Complete,
  /// A frame violated the fragmentation order. Only [`MessageAssembler::reset`] leaves this
  /// state.
  Errored,
}

#[derive(Debug)]
struct StreamBuilder {
  accumulated: Vec<u8>,
  kind: MessageKind,
  state: StreamState,
}

impl StreamBuilder {
  const fn new() -> Self {
    Self { accumulated: Vec::new(), kind: MessageKind::Empty, state: StreamState::Empty }
  }

  fn clear(&mut self) {
    self.accumulated.clear();
    self.kind = MessageKind::Empty;
    self.state = StreamState::Empty;
  }
}

/// Turns frames into messages, tracking fragmentation across calls.
///
/// Control frames are delivered right away and never touch an in-progress fragmented message.
#[derive(Debug)]
pub struct MessageAssembler {
  builder: StreamBuilder,
  pending_policy: Option<FragmentsPolicy>,
  policy: FragmentsPolicy,
}

impl MessageAssembler {
  /// Empty instance
  #[inline]
  pub const fn new(policy: FragmentsPolicy) -> Self {
    Self { builder: StreamBuilder::new(), pending_policy: None, policy }
  }

  /// Feeds a frame. Returns a message when `frame` completes one, or, with
  /// [`FragmentsPolicy::Notify`], for every fragment.
  ///
  /// `max_payload_len` bounds aggregated messages.
  #[inline]
  pub fn on_frame(
    &mut self,
    frame: Frame,
    max_payload_len: usize,
  ) -> crate::Result<Option<Message>> {
    if self.builder.state == StreamState::Errored {
      return Err(WebSocketError::UnexpectedFrame.into());
    }
    if frame.op_code().is_control() {
      let kind = MessageKind::from_op_code(frame.op_code());
      return Ok(Some(Message::new(kind, MessageRole::Complete, frame.into_payload())));
    }
    let is_open = self.builder.state == StreamState::Open;
    match (frame.fin(), frame.op_code().is_continuation()) {
      (true, false) => {
        if is_open {
          return Err(self.errored(WebSocketError::UnexpectedFrame));
        }
        let kind = MessageKind::from_op_code(frame.op_code());
        Ok(Some(Message::new(kind, MessageRole::Complete, frame.into_payload())))
      }
      (false, false) => {
        if is_open {
          return Err(self.errored(WebSocketError::UnexpectedFrame));
        }
        self.builder.kind = MessageKind::from_op_code(frame.op_code());
        self.builder.state = StreamState::Open;
        self.manage_fragment(frame, max_payload_len, MessageRole::First)
      }
      (false, true) => {
        if !is_open {
          return Err(self.errored(WebSocketError::UnexpectedFrame));
        }
        self.manage_fragment(frame, max_payload_len, MessageRole::Continuation)
      }
      (true, true) => {
        if !is_open {
          return Err(self.errored(WebSocketError::UnexpectedFrame));
        }
        self.builder.state = StreamState::Complete;
        let kind = self.builder.kind;
        let rslt = match self.policy {
          FragmentsPolicy::Aggregate => {
            self.accumulate(frame.payload(), max_payload_len)?;
            let bytes = core::mem::take(&mut self.builder.accumulated);
            Message::new(kind, MessageRole::Complete, bytes)
          }
          FragmentsPolicy::Notify => Message::new(kind, MessageRole::Last, frame.into_payload()),
        };
        self.clear();
        Ok(Some(rslt))
      }
    }
  }

  /// Errored assemblers must be reset before accepting new frames.
  #[inline]
  pub fn is_errored(&self) -> bool {
    self.builder.state == StreamState::Errored
  }

  /// If a fragmented message is in progress.
  #[inline]
  pub fn is_streaming(&self) -> bool {
    self.builder.state == StreamState::Open
  }

  /// The most recently requested [`FragmentsPolicy`], even if it is still pending.
  #[inline]
  pub fn policy(&self) -> FragmentsPolicy {
    self.pending_policy.unwrap_or(self.policy)
  }

  /// Discards any in-progress message and returns to [`StreamState::Empty`].
  #[inline]
  pub fn reset(&mut self) {
    self.clear();
  }

  /// A fragmented message that is in progress keeps being delivered with the policy it started
  /// with. The new policy applies from the next message onwards.
  #[inline]
  pub fn set_policy(&mut self, policy: FragmentsPolicy) {
    if self.builder.state == StreamState::Open {
      self.pending_policy = (policy != self.policy).then_some(policy);
    } else {
      self.pending_policy = None;
      self.policy = policy;
    }
  }

  /// See [`StreamState`]. Never [`StreamState::Complete`].
  #[inline]
  pub fn state(&self) -> StreamState {
    self.builder.state
  }

  fn accumulate(&mut self, payload: &[u8], max_payload_len: usize) -> crate::Result<()> {
    if self.builder.accumulated.len().saturating_add(payload.len()) > max_payload_len {
      return Err(self.errored(WebSocketError::VeryLargePayload));
    }
    self.builder.accumulated.extend_from_slice(payload);
    Ok(())
  }

  fn clear(&mut self) {
    self.builder.clear();
    if let Some(policy) = self.pending_policy.take() {
      self.policy = policy;
    }
  }

  fn errored(&mut self, err: WebSocketError) -> crate::Error {
    _debug!("Fragmentation error: {err:?}");
    self.builder.accumulated.clear();
    self.builder.state = StreamState::Errored;
    err.into()
  }

  fn manage_fragment(
    &mut self,
    frame: Frame,
    max_payload_len: usize,
    role: MessageRole,
  ) -> crate::Result<Option<Message>> {
    match self.policy {
      FragmentsPolicy::Aggregate => {
        self.accumulate(frame.payload(), max_payload_len)?;
        Ok(None)
      }
      FragmentsPolicy::Notify => {
        Ok(Some(Message::new(self.builder.kind, role, frame.into_payload())))
      }
    }
  }
}

impl Default for MessageAssembler {
  #[inline]
  fn default() -> Self {
    Self::new(FragmentsPolicy::Aggregate)
  }
}

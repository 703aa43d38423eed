use crate::{
  transport::Transport,
  web_socket::{
    misc::{has_masked_frame, op_code},
    web_socket_reader::read_array,
    OpCode, WebSocketError, FIN_MASK, MAX_CONTROL_PAYLOAD_LEN, PAYLOAD_LEN_MASK, RSV_MASK,
  },
};

/// Parameters of a WebSocket frame header.
#[derive(Debug)]
pub(crate) struct ReadFrameInfo {
  pub(crate) fin: bool,
  pub(crate) mask: Option<[u8; 4]>,
  pub(crate) op_code: OpCode,
  pub(crate) payload_len: usize,
}

impl ReadFrameInfo {
  pub(crate) fn from_bytes(bytes: &mut &[u8], max_payload_len: usize) -> crate::Result<Self> {
    let first_two = {
      let [a, b, rest @ ..] = bytes else {
        return Err(crate::Error::UnexpectedBufferState);
      };
      *bytes = rest;
      [*a, *b]
    };
    let (fin, is_masked, length_code, op_code) = Self::manage_first_two_bytes(first_two)?;
    let payload_len = match length_code {
      126 => {
        let [a, b, rest @ ..] = bytes else {
          return Err(crate::Error::UnexpectedBufferState);
        };
        *bytes = rest;
        u16::from_be_bytes([*a, *b]).into()
      }
      127 => {
        let [a, b, c, d, e, f, g, h, rest @ ..] = bytes else {
          return Err(crate::Error::UnexpectedBufferState);
        };
        *bytes = rest;
        u64::from_be_bytes([*a, *b, *c, *d, *e, *f, *g, *h]).try_into()?
      }
      _ => length_code.into(),
    };
    Self::manage_final_params(fin, op_code, max_payload_len, payload_len)?;
    let mut mask = None;
    if is_masked {
      let [a, b, c, d, rest @ ..] = bytes else {
        return Err(crate::Error::UnexpectedBufferState);
      };
      *bytes = rest;
      mask = Some([*a, *b, *c, *d]);
    }
    Ok(Self { fin, mask, op_code, payload_len })
  }

  pub(crate) fn from_transport<T>(max_payload_len: usize, transport: &mut T) -> crate::Result<Self>
  where
    T: Transport,
  {
    let first_two = read_array::<2, _>(transport)?;
    let (fin, is_masked, length_code, op_code) = Self::manage_first_two_bytes(first_two)?;
    let payload_len = match length_code {
      126 => u16::from_be_bytes(read_array::<2, _>(transport)?).into(),
      127 => u64::from_be_bytes(read_array::<8, _>(transport)?).try_into()?,
      _ => length_code.into(),
    };
    Self::manage_final_params(fin, op_code, max_payload_len, payload_len)?;
    let mask = if is_masked { Some(read_array::<4, _>(transport)?) } else { None };
    _trace!(fin, is_masked, ?op_code, payload_len, "Received frame header");
    Ok(Self { fin, mask, op_code, payload_len })
  }

  fn manage_final_params(
    fin: bool,
    op_code: OpCode,
    max_payload_len: usize,
    payload_len: usize,
  ) -> crate::Result<()> {
    if op_code.is_control() && !fin {
      return Err(WebSocketError::UnexpectedFragmentedControlFrame.into());
    }
    if op_code.is_control() && payload_len > MAX_CONTROL_PAYLOAD_LEN {
      return Err(WebSocketError::VeryLargeControlFrame.into());
    }
    if payload_len > max_payload_len {
      return Err(WebSocketError::VeryLargePayload.into());
    }
    Ok(())
  }

  fn manage_first_two_bytes([a, b]: [u8; 2]) -> crate::Result<(bool, bool, u8, OpCode)> {
    if a & RSV_MASK != 0 {
      return Err(WebSocketError::ReservedBitsAreNotZero.into());
    }
    let fin = a & FIN_MASK != 0;
    let length_code = b & PAYLOAD_LEN_MASK;
    let op_code = op_code(a)?;
    Ok((fin, has_masked_frame(b), length_code, op_code))
  }
}

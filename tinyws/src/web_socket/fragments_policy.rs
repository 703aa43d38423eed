/// How fragmented messages are delivered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FragmentsPolicy {
  /// Fragments are buffered and delivered as a single complete message.
  #[default]
  Aggregate,
  /// Each fragment is delivered as soon as it arrives. Callers are responsible for stitching
  /// the parts together.
  Notify,
}

use sentiment_core::Segment;

/// Join segment texts for whole-document scoring.
///
/// Every segment, the last included, is followed by a single space. Text inside a segment is
/// left untouched.
pub fn reduce(segments: &[Segment]) -> String {
  let capacity = segments.iter().map(|s| s.text.len() + 1).sum();
  let mut text = String::with_capacity(capacity);
  for segment in segments {
    text.push_str(&segment.text);
    text.push(' ');
  }
  text
}

use sentiment_core::{Analysis, Segment, TaskResult};

/// Shape the task output.
///
/// Without segments the whole-document analysis is returned alone. With segments, each one is
/// scored on its own text only and the series keeps the input order and timestamps.
pub fn assemble<F>(whole: Analysis, segments: Option<Vec<Segment>>, score_segment: F) -> TaskResult
where
  F: Fn(&str) -> u8,
{
  match segments {
    None => TaskResult::Document(whole),
    Some(segments) => {
      let series = segments
        .into_iter()
        .map(|mut segment| {
          segment.score = Some(score_segment(&segment.text));
          segment
        })
        .collect();
      TaskResult::Series {
        metadata: whole,
        series,
      }
    }
  }
}

//! Status board graph model.
//!
//! A line graph with one data sequence per series, in the layout dashboard
//! panels poll for:
//!
//! ```json
//! {"graph":{"title":"Clarice","type":"line","datasequences":[
//!   {"title":"sensor1","refreshEveryNSeconds":"15","datapoints":[{"title":"1388859588","value":161901}]}
//! ]}}
//! ```

use super::sensor::{Sample, Timestamp};
use serde::{Deserialize, Serialize};

/// Kind of graph to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    /// A line graph.
    #[default]
    Line,
}

/// One point on a sequence; `title` is the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// The x-axis label (sample timestamp).
    pub title: Timestamp,
    /// The reading, truncated to an integer.
    pub value: i64,
}

/// A titled series of points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSequence {
    /// Series title (the legend entry).
    pub title: String,
    /// How often the panel should poll, as a string of seconds.
    #[serde(rename = "refreshEveryNSeconds")]
    pub refresh_every_n_seconds: String,
    /// The plotted points, oldest first.
    pub datapoints: Vec<DataPoint>,
}

impl DataSequence {
    /// Builds a sequence from samples, skipping unknown values.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_samples<'a>(
        title: impl Into<String>,
        refresh_secs: u64,
        samples: impl IntoIterator<Item = &'a Sample>,
    ) -> Self {
        let datapoints = samples
            .into_iter()
            .filter_map(|sample| {
                sample
                    .value
                    .filter(|v| v.is_finite())
                    .map(|v| DataPoint {
                        title: sample.timestamp,
                        value: v.trunc() as i64,
                    })
            })
            .collect();

        Self {
            title: title.into(),
            refresh_every_n_seconds: refresh_secs.to_string(),
            datapoints,
        }
    }
}

/// The graph body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Graph title.
    pub title: String,
    /// Graph kind.
    #[serde(rename = "type")]
    pub graph_type: GraphType,
    /// One sequence per series.
    pub datasequences: Vec<DataSequence>,
}

/// Envelope wrapping a [`Graph`] under `graph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// The graph.
    pub graph: Graph,
}

impl GraphDocument {
    /// Creates a line graph document.
    #[must_use]
    pub fn line(title: impl Into<String>, datasequences: Vec<DataSequence>) -> Self {
        Self {
            graph: Graph {
                title: title.into(),
                graph_type: GraphType::Line,
                datasequences,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: i64, v: Option<f64>) -> Sample {
        Sample::new(Timestamp::from_secs(t), v)
    }

    #[test]
    fn test_sequence_skips_unknown_and_truncates() {
        let samples = [
            sample(10, Some(161_901.742_83)),
            sample(13, None),
            sample(16, Some(-2.9)),
        ];
        let seq = DataSequence::from_samples("sensor1", 15, &samples);

        assert_eq!(seq.refresh_every_n_seconds, "15");
        assert_eq!(seq.datapoints.len(), 2);
        assert_eq!(seq.datapoints[0].value, 161_901);
        assert_eq!(seq.datapoints[1].value, -2);
        assert_eq!(seq.datapoints[1].title, Timestamp::from_secs(16));
    }

    #[test]
    fn test_graph_document_shape() {
        let seq = DataSequence::from_samples("sensor1", 15, &[sample(1_388_859_588, Some(7.0))]);
        let doc = GraphDocument::line("Clarice", vec![seq]);
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["graph"]["title"], "Clarice");
        assert_eq!(json["graph"]["type"], "line");
        let seq = &json["graph"]["datasequences"][0];
        assert_eq!(seq["title"], "sensor1");
        assert_eq!(seq["refreshEveryNSeconds"], "15");
        assert_eq!(seq["datapoints"][0]["title"], "1388859588");
        assert_eq!(seq["datapoints"][0]["value"], 7);
    }
}

//! Report formatters for a finished run.
//!
//! - [`TextReport`] for people, colored through `yansi`
//! - [`JsonReport`] for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::error::ExitCode;
//! use mediasweep::output::{JsonReport, TextReport};
//! use mediasweep::pipeline::{Pipeline, PipelineConfig};
//! use mediasweep::progress::SilentProgress;
//! use std::path::Path;
//!
//! let root = Path::new("/photos");
//! let summary = Pipeline::new(PipelineConfig::for_root(root))
//!     .run(root, &SilentProgress)
//!     .unwrap();
//!
//! TextReport::new(&summary).write_to(&mut std::io::stdout()).unwrap();
//!
//! let report = JsonReport::new(&summary, ExitCode::from_summary(&summary));
//! println!("{}", report.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::JsonReport;
pub use text::TextReport;

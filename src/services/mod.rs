//! Services around the segmentation core: file I/O, encoding and progress

pub mod format;
pub mod io;
pub mod progress;

pub use format::OutputFormatHandler;
pub use io::ImageIOService;
pub use progress::{
    create_cli_progress_reporter, BatchProgress, ConsoleProgressReporter,
    EnhancedProgressReporter, NoOpProgressReporter, ProcessingStage, ProgressReporter,
    ProgressTracker, ProgressUpdate,
};

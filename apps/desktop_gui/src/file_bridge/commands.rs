//! File commands queued from UI to the document I/O worker.

use std::path::PathBuf;

use shared::persist::MapDocument;

pub enum FileCommand {
    LoadDocument {
        path: PathBuf,
    },
    SaveDocument {
        path: PathBuf,
        document: MapDocument,
    },
}

/// Oldest Ninja release that understands every construct we emit (`deps = gcc`).
pub const NINJA_REQUIRED_VERSION: &str = "1.3";

/// Default name of the generated build description.
pub const BUILD_FILE: &str = "build.ninja";

/// Root for object files and Ninja's own state (`builddir`).
pub const OBJ_DIR: &str = "obj";

/// Root for linked binaries and archives.
pub const BIN_DIR: &str = "bin";

/// Root for the amalgamated single header.
pub const DIST_DIR: &str = "dist";

/// Extension given to every compiled object.
pub const OBJECT_EXTENSION: &str = "o";

/// Column at which the writer starts wrapping long lines.
pub const LINE_WIDTH: usize = 78;

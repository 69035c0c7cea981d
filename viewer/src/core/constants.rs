// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "TraceScope";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "tracescope";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".tracescope";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tracescope.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TRACESCOPE_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TRACESCOPE_LOG";

/// Environment variable for the trace API base URL
pub const ENV_API_URL: &str = "TRACESCOPE_API_URL";

/// Environment variable for the trace API bearer token
pub const ENV_API_TOKEN: &str = "TRACESCOPE_API_TOKEN";

/// Environment variable for a trace file or directory
pub const ENV_FILE: &str = "TRACESCOPE_FILE";

/// Environment variable for output width in columns
pub const ENV_WIDTH: &str = "TRACESCOPE_WIDTH";

/// Environment variable to disable ANSI colors
pub const ENV_NO_COLOR: &str = "TRACESCOPE_NO_COLOR";

/// Default log filter when neither env variable is set
pub const DEFAULT_LOG_FILTER: &str = "warn,tracescope_viewer=info";

// =============================================================================
// API Defaults
// =============================================================================

/// Default request timeout for the trace API
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default total attempts per API request
pub const DEFAULT_API_ATTEMPTS: u32 = 3;

/// Upper bound accepted for `api.retries`
pub const MAX_API_ATTEMPTS: u32 = 10;

/// Default page size for trace listing
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Maximum page size for trace listing
pub const MAX_PAGE_LIMIT: u32 = 100;

// =============================================================================
// Layout
// =============================================================================

/// Minimum visible bar width in percent of the timeline
pub const FLOOR_WIDTH_PERCENT: f64 = 0.5;

/// Timeline axis marker positions in percent
pub const AXIS_MARKERS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// Indentation is capped at this depth to keep deep trees readable
pub const MAX_INDENT_DEPTH: usize = 16;

/// Spaces of indentation per tree level
pub const INDENT_WIDTH: usize = 2;

// =============================================================================
// Rendering
// =============================================================================

/// Default terminal width in columns
pub const DEFAULT_WIDTH: usize = 120;

/// Smallest width the waterfall can be drawn at
pub const MIN_WIDTH: usize = 60;

/// Columns reserved for the span label in each waterfall row
pub const LABEL_COLUMNS: usize = 40;

/// Metadata entries shown in the detail panel before collapsing
pub const MAX_METADATA_ENTRIES: usize = 10;

/// Maximum characters of a span name shown in a row label
pub const MAX_LABEL_NAME_CHARS: usize = 32;

//! The three edits that turn a runtime source tree into one that runs an
//! embedded application.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patch::Patch;

/// Name under which the application bundle is compiled into the runtime.
pub const MODULE_NAME: &str = "runbake";

/// Location of the embedded bundle, relative to the tree root.
pub const MODULE_FILE: &str = "lib/runbake.js";

const GYP_ANCHOR: &str = "'lib/fs.js',";
const GYP_MARKER: &str = "'lib/runbake.js'";

const BOOTSTRAP_ANCHOR: &str = "(function(process) {";
const BOOTSTRAP_MARKER: &str = "process._eval = 'require(\"runbake\");';";

const FLAGS_START: &str = "  // TODO use parse opts";
const FLAGS_END: &str = "  option_end_index = i;";
const FLAGS_MARKER: &str = "//  // TODO use parse opts";

static FLAGS_START_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^  // TODO use parse opts\r?$").unwrap());
static FLAGS_END_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^  option_end_index = i;(\r?)$").unwrap());

/// Lists the bundle among the library files compiled into the binary.
pub fn gyp_module() -> Patch {
    Patch::new(
        "gyp-module",
        "node.gyp",
        |s| s.contains(GYP_MARKER),
        |s| {
            if !s.contains(GYP_ANCHOR) {
                return Err(GYP_ANCHOR.to_string());
            }
            Ok(s.replacen(GYP_ANCHOR, &format!("{GYP_ANCHOR} {GYP_MARKER}, "), 1))
        },
    )
}

/// Makes the runtime evaluate the bundle on start-up as if it were the
/// script named on the command line.
pub fn bootstrap_eval() -> Patch {
    Patch::new(
        "bootstrap-eval",
        "src/node.js",
        |s| s.contains(BOOTSTRAP_MARKER),
        |s| {
            let at = s
                .find(BOOTSTRAP_ANCHOR)
                .ok_or_else(|| BOOTSTRAP_ANCHOR.to_string())?
                + BOOTSTRAP_ANCHOR.len();
            let injected = format!("\n  {BOOTSTRAP_MARKER}\n  process.argv.unshift(\"node\");\n");
            let mut out = String::with_capacity(s.len() + injected.len());
            out.push_str(&s[..at]);
            out.push_str(&injected);
            out.push_str(&s[at..]);
            Ok(out)
        },
    )
}

/// Stops the runtime from consuming its own command line options, so every
/// argument reaches the application.
pub fn suppress_cli_flags() -> Patch {
    Patch::new(
        "suppress-cli-flags",
        "src/node.cc",
        |s| s.contains(FLAGS_MARKER),
        comment_out_option_parsing,
    )
}

fn comment_out_option_parsing(s: &str) -> std::result::Result<String, String> {
    let start = FLAGS_START_LINE
        .find(s)
        .ok_or_else(|| FLAGS_START.to_string())?
        .start();
    let end = FLAGS_END_LINE
        .captures_at(s, start)
        .ok_or_else(|| FLAGS_END.to_string())?;
    let end_line = end.get(0).map_or(s.len()..s.len(), |m| m.range());
    let carriage_return = end.get(1).map_or("", |m| m.as_str());

    let mut out = String::with_capacity(s.len() + 256);
    out.push_str(&s[..start]);
    for line in s[start..end_line.start].split_inclusive('\n') {
        out.push_str("//");
        out.push_str(line);
    }
    out.push_str("  option_end_index = 1;");
    out.push_str(carriage_return);
    out.push_str(&s[end_line.end..]);
    Ok(out)
}

/// Patches applied to every build, in order.
pub fn always() -> [Patch; 2] {
    [gyp_module(), bootstrap_eval()]
}

use std::path::Path;

use proptest::prelude::*;
use runbake_fs::{DiskFs, MemoryFs};
use runbake_patch::{PatchOutcome, builtin};

const NODE_CC: &str = "\
int main() {
  // TODO use parse opts
  ParseOne(argv[i]);
  option_end_index = i;
}
";

fn tree() -> MemoryFs {
    MemoryFs::new()
        .with_file("/node/node.gyp", "'library_files': [\n  'lib/fs.js',\n]")
        .with_file("/node/src/node.js", "(function(process) {\n  startup();\n})")
        .with_file("/node/src/node.cc", NODE_CC)
}

#[test]
fn every_builtin_patch_is_idempotent_against_a_tree() {
    let fs = tree();
    let root = Path::new("/node");
    let patches = [
        builtin::gyp_module(),
        builtin::bootstrap_eval(),
        builtin::suppress_cli_flags(),
    ];

    for patch in &patches {
        assert_eq!(patch.apply(&fs, root).unwrap(), PatchOutcome::Applied);
    }
    let snapshot: Vec<_> = patches
        .iter()
        .map(|p| fs.get(&root.join(p.target())).unwrap())
        .collect();
    let writes = fs.write_count();

    for patch in &patches {
        assert_eq!(patch.apply(&fs, root).unwrap(), PatchOutcome::AlreadyApplied);
    }
    assert_eq!(fs.write_count(), writes);
    for (patch, before) in patches.iter().zip(snapshot) {
        assert_eq!(fs.get(&root.join(patch.target())).unwrap(), before);
    }
}

#[test]
fn already_patched_content_is_left_untouched() {
    let fs = MemoryFs::new().with_file(
        "/node/src/node.cc",
        "//  // TODO use parse opts\n  option_end_index = 1;\n",
    );
    let outcome = builtin::suppress_cli_flags()
        .apply(&fs, Path::new("/node"))
        .unwrap();
    assert_eq!(outcome, PatchOutcome::AlreadyApplied);
    assert_eq!(fs.write_count(), 0);
}

#[test]
fn patches_disk_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/node.cc"), NODE_CC).unwrap();

    let patch = builtin::suppress_cli_flags();
    assert_eq!(patch.apply(&DiskFs, dir.path()).unwrap(), PatchOutcome::Applied);
    let once = std::fs::read_to_string(dir.path().join("src/node.cc")).unwrap();
    assert_eq!(patch.apply(&DiskFs, dir.path()).unwrap(), PatchOutcome::AlreadyApplied);
    let twice = std::fs::read_to_string(dir.path().join("src/node.cc")).unwrap();
    assert_eq!(once, twice);
    assert!(once.contains("//  ParseOne(argv[i]);\n"));
}

proptest! {
    #[test]
    fn applying_twice_equals_applying_once(
        head in "[a-z ;\n]{0,40}",
        tail in "[a-z ;\n]{0,40}",
    ) {
        let inputs = [
            (builtin::gyp_module(), format!("{head}'lib/fs.js',{tail}")),
            (builtin::bootstrap_eval(), format!("{head}(function(process) {{{tail}")),
            (
                builtin::suppress_cli_flags(),
                format!("{head}\n  // TODO use parse opts\n{tail}\n  option_end_index = i;\n{tail}"),
            ),
        ];
        for (patch, content) in inputs {
            let once = patch.apply_to_str(&content).unwrap().unwrap();
            prop_assert!(patch.is_applied(&once));
            prop_assert_eq!(patch.apply_to_str(&once).unwrap(), None);
        }
    }
}

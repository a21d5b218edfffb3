use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{json, Value};
use speculate2::speculate;
use trekker_tokens_core::{append_changelog, DiffOutcome};
use trekker_tokens_core::changelog::{Change, Summary};

fn tokens_document(background: Value) -> Value {
    json!({
        "exportedAt": "2026-10-19T08:00:00.000000+00:00",
        "collections": {
            "color": {
                "name": "Color",
                "modes": ["Light", "Dark"],
                "_meta": { "collectionId": "VariableCollectionId:1:0", "modes": { "Light": "1:0", "Dark": "1:1" } },
                "groups": { "background": { "label": "Background", "tokens": background } }
            },
            "size": {
                "name": "Size",
                "groups": { "spacing": { "label": "Spacing", "tokens": [
                    { "name": "spacing/100", "value": 4, "description": "", "_figmaId": "VariableID:3:1" }
                ] } }
            }
        }
    })
}

fn primary(hex: &str, figma_id: &str) -> Value {
    json!({
        "name": "background/primary",
        "description": "Page background",
        "_figmaId": figma_id,
        "light": { "hex": hex, "alias": "base-100" },
        "dark": { "hex": "1A1A1A" }
    })
}

fn write(dir: &Path, name: &str, document: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    path
}

fn read(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let old = write(dir.path(), "old.json", &tokens_document(json!([primary("E6E4D9", "VariableID:1:1")])));
    }

    describe "append_changelog" {
        it "leaves an identical document untouched" {
            let new = write(dir.path(), "new.json", &tokens_document(json!([primary("E6E4D9", "VariableID:1:1")])));
            let before = fs::read(&new).unwrap();
            let modified = fs::metadata(&new).unwrap().modified().unwrap();

            let outcome = append_changelog(&old, &new, None, Utc::now()).expect("Diff failed");

            assert_eq!(outcome, DiffOutcome::Unchanged);
            assert_eq!(fs::read(&new).unwrap(), before);
            assert_eq!(fs::metadata(&new).unwrap().modified().unwrap(), modified);
        }

        it "diffing a document against itself changes nothing" {
            let before = fs::read(&old).unwrap();
            let outcome = append_changelog(&old, &old, Some("noop"), Utc::now()).expect("Diff failed");
            assert_eq!(outcome, DiffOutcome::Unchanged);
            assert_eq!(fs::read(&old).unwrap(), before);
        }

        it "ignores changes confined to metadata" {
            let new = write(dir.path(), "new.json", &tokens_document(json!([primary("E6E4D9", "VariableID:7:7")])));
            let outcome = append_changelog(&old, &new, None, Utc::now()).expect("Diff failed");
            assert_eq!(outcome, DiffOutcome::Unchanged);
        }

        it "records an added token" {
            let new = write(dir.path(), "new.json", &tokens_document(json!([
                primary("E6E4D9", "VariableID:1:1"),
                { "name": "background/secondary", "light": { "hex": "FFFFFF" }, "dark": { "hex": "000000" } }
            ])));

            let outcome = append_changelog(&old, &new, None, Utc::now()).expect("Diff failed");

            let DiffOutcome::Recorded { entry, position } = outcome else {
                panic!("expected a changelog entry");
            };
            assert_eq!(position, 1);
            assert_eq!(entry.summary, Summary { added: 1, changed: 0, removed: 0 });
            assert_eq!(entry.notes, "Sync: +1 added, ~0 changed, -0 removed.");
            let Change::Added { collection, group, name, .. } = &entry.changes[0] else {
                panic!("expected an addition");
            };
            assert_eq!((collection.as_str(), group.as_str(), name.as_str()), ("color", "background", "background/secondary"));

            let written = read(&new);
            assert_eq!(written["changelog"][0]["changes"][0]["value"], json!({ "light": "FFFFFF", "dark": "000000" }));
            assert_eq!(written["collections"], tokens_document(json!([
                primary("E6E4D9", "VariableID:1:1"),
                { "name": "background/secondary", "light": { "hex": "FFFFFF" }, "dark": { "hex": "000000" } }
            ]))["collections"]);
        }

        it "records removals and value changes with notes" {
            let new = write(dir.path(), "new.json", &json!({
                "exportedAt": "2026-10-19T09:00:00.000000+00:00",
                "collections": {
                    "color": { "name": "Color", "groups": { "background": { "label": "Background", "tokens": [primary("F0F0F0", "VariableID:1:1")] } } }
                },
                "changelog": [{ "date": "2026-10-01T00:00:00+00:00", "changes": [], "summary": { "added": 0, "changed": 0, "removed": 0 }, "notes": "earlier" }]
            }));

            let outcome = append_changelog(&old, &new, Some("Palette refresh"), Utc::now()).expect("Diff failed");

            let DiffOutcome::Recorded { entry, position } = outcome else {
                panic!("expected a changelog entry");
            };
            assert_eq!(position, 2);
            assert_eq!(entry.notes, "Palette refresh");
            assert_eq!(entry.summary, Summary { added: 0, changed: 1, removed: 1 });

            let written = read(&new);
            let keys: Vec<_> = written.as_object().unwrap().keys().cloned().collect();
            assert_eq!(keys, vec!["exportedAt", "collections", "changelog"]);
            assert_eq!(written["changelog"][0]["notes"], json!("earlier"));
            assert_eq!(written["changelog"][1]["changes"], json!([
                { "type": "removed", "collection": "size", "group": "spacing", "name": "spacing/100" },
                {
                    "type": "changed", "collection": "color", "group": "background", "name": "background/primary",
                    "before": { "light": "E6E4D9", "dark": "1A1A1A" },
                    "after": { "light": "F0F0F0", "dark": "1A1A1A" }
                }
            ]));
        }

        it "fails on an unreadable document" {
            let new = dir.path().join("missing.json");
            assert!(append_changelog(&old, &new, None, Utc::now()).is_err());
            assert!(!new.exists());
        }
    }
}

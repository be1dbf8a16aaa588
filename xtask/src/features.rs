use std::process::Command;

use anyhow::{Context, Result};

/// `(package, features)` pairs that must build and pass tests.
const FEATURE_COMBINATIONS: &[(&str, &[&str])] = &[
    ("authgate-core", &[]), // default
    ("authgate-core", &["test-utils"]),
    ("authgate-infra", &[]),
];

/// Check that every feature combination builds and its tests pass.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, (package, features)) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let display_label =
            if features.is_empty() { format!("{package} (default)") } else { format!("{package} +{joined}") };

        println!("\n[{}/{}] cargo test -p {display_label}", index + 1, FEATURE_COMBINATIONS.len());

        let mut command = Command::new("cargo");
        command.arg("test").arg("-p").arg(package);
        if !features.is_empty() {
            command.arg("--features").arg(&joined);
        }

        let status = command
            .status()
            .with_context(|| format!("Failed to run cargo test for '{display_label}'"))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{display_label}' failed");
        }

        println!("✅ {display_label} passed");
    }

    println!("\n✅ All {} feature combinations pass!", FEATURE_COMBINATIONS.len());

    Ok(())
}

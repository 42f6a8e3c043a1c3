//! Key management commands.
//!
//! `relay keys generate` - Generate a new HMAC key.

use relay_cwt::HmacKey;
use std::fs;
use std::path::PathBuf;

/// Generate a new random HMAC key.
pub fn generate(bytes: usize, output: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::ensure!(bytes > 0, "Key length must be at least 1 byte");
    let key = HmacKey::generate(bytes);

    if let Some(output_path) = output {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, key.to_base64())?;

        println!("✔ Generated HMAC key ({} bytes):", key.len());
        println!("  Key file: {}", output_path.display());
        println!();
        println!("⚠️  Keep your key secure! Never commit it to version control.");
        println!();
        println!("Set as environment variable:");
        println!("  export RELAY_HMAC_KEY=$(cat {})", output_path.display());
    } else {
        println!("{}", key.to_base64());
    }

    Ok(())
}

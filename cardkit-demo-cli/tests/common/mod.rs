//! Common test utilities for cardkit-demo-cli integration tests

use cardkit_lib::test_utils::fixtures;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Temporary directory holding product fixture files
#[allow(dead_code)]
pub struct TestContext {
    pub temp_dir: TempDir,
    pub product: PathBuf,
    pub products: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let product = temp_dir.path().join("product.json");
        let products = temp_dir.path().join("products.json");
        std::fs::write(&product, fixtures::visa_product_json().to_string()).unwrap();
        std::fs::write(&products, fixtures::product_list_json().to_string()).unwrap();

        Self {
            temp_dir,
            product,
            products,
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn product_arg(&self) -> String {
        self.product.display().to_string()
    }
}

/// Run the CLI binary, returning (stdout, stderr, success)
pub fn run_cli(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_cardkit-demo"))
        .args(args)
        .env_remove("CARDKIT_CLIENT_SESSION_ID")
        .env_remove("CARDKIT_CUSTOMER_ID")
        .env_remove("CARDKIT_CLIENT_API_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    // Print output for debugging if test fails
    if !output.status.success() {
        eprintln!("stdout: {}", stdout);
        eprintln!("stderr: {}", stderr);
    }

    (stdout, stderr, output.status.success())
}

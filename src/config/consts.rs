// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// File extensions read as YAML configuration
pub const YAML_EXTENSIONS: [&str; 2] = ["yaml", "yml"];
/// File extension read as TOML configuration
pub const TOML_EXTENSION: &str = "toml";
/// Schemas are compacted before build unless a config opts out
pub const DEFAULT_COMPACT: bool = true;

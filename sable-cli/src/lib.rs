use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use sable_compiler::{Compiler, CompilerOptions, ContentType};

pub struct BuildConfig {
    pub out_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub no_cache: bool,
    pub xml: bool,
    pub keep_comments: bool,
}

/// Compile a template file into a PHP artifact written to `out_dir`.
pub fn build_cmd(input: &Path, config: &BuildConfig) -> Result<PathBuf> {
    let template_dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = input
        .file_name()
        .map(PathBuf::from)
        .with_context(|| format!("not a template file: {}", input.display()))?;

    let options = CompilerOptions {
        template_dir,
        cache_dir: if config.no_cache {
            None
        } else {
            config.cache_dir.clone()
        },
        skip_comments: !config.keep_comments,
        content_type: if config.xml {
            ContentType::Xml
        } else {
            ContentType::Html
        },
    };
    let compiler = Compiler::new(options);
    let artifact = compiler
        .compile_file(&file_name)
        .with_context(|| format!("failed to compile {}", input.display()))?;

    let out_dir = config
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("target/sable-gen"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("template");
    let out_path = out_dir.join(format!("{}.php", name));
    fs::write(&out_path, artifact)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!("Generated: {}", out_path.display());
    Ok(out_path)
}

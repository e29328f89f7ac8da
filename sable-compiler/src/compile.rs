use std::fs;
use std::path::{Path, PathBuf};

use sable_dom::{parse, ContentType, Document, NodeId, NodeKind};

use crate::attrs::{compile_attrs, ControlOpen};
use crate::cache::CompileCache;
use crate::emit;
use crate::error::CompileError;
use crate::expr::rewrite_calls;
use crate::interp::scan_interpolations;
use crate::translate::TranslationScope;

/// Transparent container: its own open and close tags are suppressed, only
/// its contents pass through. Used to attach directives to a group of
/// siblings without a wrapping element.
pub const TRANSPARENT_TAG: &str = "s-tag";

/// Cycle guard for partial includes.
const MAX_INCLUDE_DEPTH: usize = 64;

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Base directory for template and partial lookups.
    pub template_dir: PathBuf,
    /// `None` disables the compile cache entirely.
    pub cache_dir: Option<PathBuf>,
    pub skip_comments: bool,
    pub content_type: ContentType,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            cache_dir: None,
            skip_comments: false,
            content_type: ContentType::Html,
        }
    }
}

/// Front door of the pipeline: parse, walk, emit, cache.
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a template file, honoring the cache when one is configured.
    pub fn compile_file(&self, input: &Path) -> Result<String, CompileError> {
        self.compile_file_at_depth(input, 0)
    }

    /// Compile template source directly; `name` labels errors.
    pub fn compile_str(&self, source: &str, name: &str) -> Result<String, CompileError> {
        self.compile_source(source, name, 0)
    }

    fn resolve(&self, input: &Path) -> PathBuf {
        if input.is_absolute() {
            input.to_path_buf()
        } else {
            self.options.template_dir.join(input)
        }
    }

    fn compile_file_at_depth(&self, input: &Path, depth: usize) -> Result<String, CompileError> {
        let path = self.resolve(input);
        if !path.exists() {
            return Err(CompileError::TemplateNotFound { path });
        }
        let source_mtime = fs::metadata(&path).ok().and_then(|m| m.modified().ok());

        let cache = match &self.options.cache_dir {
            Some(dir) => Some(CompileCache::open(dir)?),
            None => None,
        };
        if let (Some(cache), Some(source_mtime)) = (&cache, source_mtime) {
            if let Some((artifact, stored)) = cache.get(&path) {
                // recompile once the source catches up to the entry
                if source_mtime < stored {
                    return Ok(artifact);
                }
            }
        }

        let source = fs::read_to_string(&path).map_err(|e| CompileError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let artifact = self.compile_source(&source, &path.display().to_string(), depth)?;
        if let Some(cache) = &cache {
            let _ = cache.put(&path, &artifact);
        }
        Ok(artifact)
    }

    fn compile_source(
        &self,
        source: &str,
        name: &str,
        depth: usize,
    ) -> Result<String, CompileError> {
        let doc = parse(source, self.options.content_type).map_err(|message| {
            CompileError::Parse {
                template: name.to_string(),
                message,
            }
        })?;
        let mut ctx = CompileContext {
            compiler: self,
            doc: &doc,
            template: name.to_string(),
            out: Vec::new(),
            scope_stack: Vec::new(),
            translation: None,
            skip_root: None,
            depth,
        };
        for &root in &doc.roots {
            ctx.walk(root)?;
        }
        debug_assert!(ctx.scope_stack.is_empty());
        Ok(ctx.out.concat())
    }
}

/// Per-compilation state threaded through the walker. A fresh context is
/// created for every compile and for every partial include; nothing here
/// outlives the call.
struct CompileContext<'a> {
    compiler: &'a Compiler,
    doc: &'a Document,
    template: String,
    /// Ordered fragments concatenated into the final artifact.
    out: Vec<String>,
    scope_stack: Vec<ControlOpen>,
    translation: Option<TranslationScope>,
    skip_root: Option<NodeId>,
    depth: usize,
}

impl<'a> CompileContext<'a> {
    /// Output-append helper: an open translation scope redirects emission
    /// into its buffer, escaped for single-quoted inclusion.
    fn append(&mut self, text: &str) {
        match &mut self.translation {
            Some(scope) => scope.buffer.push_str(&emit::escape_quotes(text, '\'')),
            None => self.out.push(text.to_string()),
        }
    }

    fn skip_active(&self) -> bool {
        self.skip_root.is_some()
    }

    fn walk(&mut self, id: NodeId) -> Result<(), CompileError> {
        let doc = self.doc;
        match &doc.nodes[id].kind {
            NodeKind::Text(text) => {
                if self.skip_active() {
                    self.append(text);
                } else {
                    self.emit_text(text);
                }
                Ok(())
            }
            NodeKind::Comment(raw) => {
                if self.compiler.options.skip_comments {
                    return Ok(());
                }
                if self.skip_active() {
                    self.append(raw);
                } else {
                    self.emit_text(raw);
                }
                Ok(())
            }
            NodeKind::Element { .. } => self.walk_element(id),
        }
    }

    fn walk_element(&mut self, id: NodeId) -> Result<(), CompileError> {
        let doc = self.doc;
        let (tag, raw_open) = match &doc.nodes[id].kind {
            NodeKind::Element { tag, raw_open, .. } => (tag, raw_open),
            _ => unreachable!("walk_element on a non-element"),
        };

        // inside a skip scope everything passes through verbatim
        if self.skip_active() && self.skip_root != Some(id) {
            self.append(raw_open);
            for &child in doc.children(id) {
                self.walk(child)?;
            }
            if tag.needs_closing_tag {
                self.append(&format!("</{}>", tag.name));
            }
            return Ok(());
        }

        if tag.processing_instruction {
            self.append(raw_open);
            return Ok(());
        }

        let compiled = compile_attrs(doc, id, &self.template)?;

        // control-flow wrappers open before the element
        let scope_base = self.scope_stack.len();
        for open in &compiled.control {
            let fragment = match open {
                ControlOpen::If(expr) => emit::php_if(expr),
                ControlOpen::ElseIf(expr) => emit::php_elseif(expr),
                ControlOpen::Else => emit::php_else().to_string(),
                ControlOpen::For(f) => {
                    if f.is_counted() {
                        emit::php_for_counted(f.item.as_deref().unwrap_or("$i"), &f.items)
                    } else if let Some(index) = &f.index {
                        emit::php_foreach_keyed(&f.items, index, f.item.as_deref().unwrap_or("$item"))
                    } else {
                        emit::php_foreach(&f.items, f.item.as_deref().unwrap_or("$item"))
                    }
                }
            };
            self.append(&fragment);
            self.scope_stack.push(open.clone());
        }

        if compiled.translation.is_some() {
            if let Some(active) = &self.translation {
                return Err(CompileError::NestedTranslation {
                    template: self.template.clone(),
                    outer: active.owner_tag.clone(),
                    inner: tag.name.clone(),
                });
            }
        }

        if compiled.skip {
            self.skip_root = Some(id);
        }

        // the owning element's own open tag always lands in the normal
        // output; the translation scope is installed after it
        let transparent = tag.name == TRANSPARENT_TAG;
        if !transparent {
            self.append(&format!(
                "<{}{}{}>",
                tag.name,
                compiled.markup(),
                if tag.self_closing { "/" } else { "" }
            ));
        }

        if let Some(open) = compiled.translation {
            self.translation = Some(TranslationScope::new(
                id,
                tag.name.clone(),
                open.key,
                open.params,
            ));
        }

        if let Some(expr) = &compiled.bind_partial {
            self.append(&emit::php_partial(expr));
        }
        if let Some(path) = &compiled.partial {
            self.include_partial(path)?;
        }

        for &child in doc.children(id) {
            self.walk(child)?;
        }

        // translation closes before the owning element's close tag
        if self.translation.as_ref().map(|t| t.owner) == Some(id) {
            let scope = self.translation.take().expect("scope checked above");
            self.append(&scope.close_fragment());
        }

        if tag.needs_closing_tag && !transparent {
            self.append(&format!("</{}>", tag.name));
        }

        if self.skip_root == Some(id) {
            self.skip_root = None;
        }

        // close staged wrappers in LIFO order; if/elseif/else chains share
        // a single terminator placed at the last chain element
        while self.scope_stack.len() > scope_base {
            match self.scope_stack.pop().expect("stack length checked") {
                ControlOpen::For(f) => {
                    let close = if f.is_counted() {
                        emit::php_endfor()
                    } else {
                        emit::php_endforeach()
                    };
                    self.append(close);
                }
                ControlOpen::If(_) | ControlOpen::ElseIf(_) | ControlOpen::Else => {
                    if !self.chain_continues(id) {
                        self.append(emit::php_endif());
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether the next meaningful sibling continues an if/elseif/else
    /// chain. Whitespace-only text and comments between chain members do
    /// not break it; their output lands inside the preceding branch.
    fn chain_continues(&self, id: NodeId) -> bool {
        let doc = self.doc;
        let mut next = doc.nodes[id].next_sibling;
        while let Some(n) = next {
            match &doc.nodes[n].kind {
                NodeKind::Text(t) if t.trim().is_empty() => next = doc.nodes[n].next_sibling,
                NodeKind::Comment(_) => next = doc.nodes[n].next_sibling,
                NodeKind::Element { .. } => {
                    return doc
                        .attrs(n)
                        .iter()
                        .any(|a| a.key == "s-elseif" || a.key == "s-else");
                }
                _ => return false,
            }
        }
        false
    }

    fn emit_text(&mut self, text: &str) {
        let spans = scan_interpolations(text);
        if spans.is_empty() {
            self.append(text);
            return;
        }
        let mut out = text.to_string();
        // substitute right-to-left so earlier offsets stay valid
        for span in spans.iter().rev() {
            let expr = rewrite_calls(span.content.trim());
            let replacement = if span.escape {
                emit::php_echo_escaped(&expr)
            } else {
                emit::php_echo_raw(&expr)
            };
            out.replace_range(span.begin..=span.end, &replacement);
        }
        self.append(&out);
    }

    /// Plain `s-partial`: compile the referenced file now with a child
    /// compiler (same configuration and cache, fresh scopes) and splice the
    /// result. Under an active skip scope the partial's raw source is
    /// spliced instead, uninterpreted.
    fn include_partial(&mut self, path: &str) -> Result<(), CompileError> {
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(CompileError::IncludeDepth {
                template: self.template.clone(),
                path: path.to_string(),
            });
        }
        if self.skip_active() {
            let resolved = self.compiler.resolve(Path::new(path));
            if !resolved.exists() {
                return Err(CompileError::TemplateNotFound { path: resolved });
            }
            let source = fs::read_to_string(&resolved).map_err(|e| CompileError::Io {
                path: resolved.clone(),
                message: e.to_string(),
            })?;
            self.append(&source);
            return Ok(());
        }
        let artifact = self
            .compiler
            .compile_file_at_depth(Path::new(path), self.depth + 1)?;
        self.append(&artifact);
        Ok(())
    }
}

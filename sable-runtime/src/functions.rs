use std::hash::Hasher;

use rustc_hash::{FxHashMap, FxHasher};

use crate::error::RuntimeError;

pub const DEFAULT_CACHE_BOUND: u32 = 1000;

/// Argument and result type of registered template functions.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    fn feed(&self, h: &mut FxHasher) {
        match self {
            Value::Null => h.write_u8(0),
            Value::Bool(b) => {
                h.write_u8(1);
                h.write_u8(*b as u8);
            }
            Value::Int(i) => {
                h.write_u8(2);
                h.write_i64(*i);
            }
            Value::Float(f) => {
                h.write_u8(3);
                h.write_u64(f.to_bits());
            }
            Value::Str(s) => {
                h.write_u8(4);
                h.write(s.as_bytes());
            }
            Value::List(items) => {
                h.write_u8(5);
                h.write_usize(items.len());
                for item in items {
                    item.feed(h);
                }
            }
        }
    }
}

fn args_fingerprint(args: &[Value]) -> u64 {
    let mut h = FxHasher::default();
    for arg in args {
        arg.feed(&mut h);
    }
    h.finish()
}

pub type TemplateFn = Box<dyn Fn(&[Value]) -> Value>;

struct Registration {
    func: TemplateFn,
    cache_bound: u32,
}

struct CachedCall {
    last: Value,
    hits: u32,
}

/// The registered-functions table the dispatch prefix resolves against,
/// plus the per-`(name, args)` result cache.
#[derive(Default)]
pub struct FunctionRegistry {
    funcs: FxHashMap<String, Registration>,
    cache: FxHashMap<(String, u64), CachedCall>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, func: F) -> Result<(), RuntimeError>
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        self.register_with_bound(name, func, DEFAULT_CACHE_BOUND)
    }

    /// `cache_bound = 0` disables result caching for this function.
    /// Registering a name twice is fatal.
    pub fn register_with_bound<F>(
        &mut self,
        name: &str,
        func: F,
        cache_bound: u32,
    ) -> Result<(), RuntimeError>
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        if self.funcs.contains_key(name) {
            return Err(RuntimeError::DuplicateFunction {
                name: name.to_string(),
            });
        }
        self.funcs.insert(
            name.to_string(),
            Registration {
                func: Box::new(func),
                cache_bound,
            },
        );
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Dispatch a rewritten call. The last result for identical arguments
    /// is served until `cache_bound` repeats, then recomputed; the repeat
    /// counter resets on every recomputation.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let reg = self
            .funcs
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownFunction {
                name: name.to_string(),
            })?;
        if reg.cache_bound == 0 {
            return Ok((reg.func)(args));
        }
        let key = (name.to_string(), args_fingerprint(args));
        if let Some(cached) = self.cache.get_mut(&key) {
            if cached.hits < reg.cache_bound {
                cached.hits += 1;
                return Ok(cached.last.clone());
            }
        }
        let result = (reg.func)(args);
        self.cache.insert(
            key,
            CachedCall {
                last: result.clone(),
                hits: 0,
            },
        );
        Ok(result)
    }
}

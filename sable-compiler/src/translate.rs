use crate::emit;
use sable_dom::NodeId;

/// The single active translation scope: the owning element, the optional
/// explicit lookup key from a typed `s-translate:<key>`, the raw parameters
/// expression, and the blueprint buffer. Everything appended to the buffer
/// is already escaped for single-quoted inclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationScope {
    pub owner: NodeId,
    pub owner_tag: String,
    pub key: Option<String>,
    pub params: String,
    pub buffer: String,
}

impl TranslationScope {
    pub fn new(owner: NodeId, owner_tag: String, key: Option<String>, params: String) -> Self {
        Self {
            owner,
            owner_tag,
            key,
            params,
            buffer: String::new(),
        }
    }

    /// The render-time call emitted in place of the buffered subtree.
    pub fn close_fragment(&self) -> String {
        emit::php_translate(&self.buffer, &self.params, self.key.as_deref())
    }
}

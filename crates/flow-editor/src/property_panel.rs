use crate::graph::{FlowGraph, NodeConfig, NodeId};
use crate::schema::{self, FieldDescriptor, FieldValue};

/// One schema field together with the node's current value for it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    pub descriptor: &'static FieldDescriptor,
    pub value: FieldValue,
}

/// Snapshot of the selected node as the property panel shows it.
///
/// A panel is rebuilt from scratch whenever the selection changes, so
/// fields of two different nodes can never be mixed.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPanel {
    node_id: NodeId,
    sub_type: String,
    label: String,
    fields: Vec<BoundField>,
}

impl PropertyPanel {
    /// Bind to the selected node. `None` when nothing is selected or the
    /// selection points at a node that no longer exists.
    pub fn bind(selection: Option<&NodeId>, graph: &FlowGraph) -> Option<Self> {
        let node = graph.node(selection?)?;
        let fields = schema::fields_for(&node.sub_type)
            .iter()
            .map(|descriptor| BoundField {
                descriptor,
                value: descriptor.read(node.config.get(descriptor.key)),
            })
            .collect();
        Some(Self {
            node_id: node.id.clone(),
            sub_type: node.sub_type.clone(),
            label: node.label.clone(),
            fields,
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.descriptor.key == key)
            .map(|field| &field.value)
    }

    /// Config patch for editing one field of the bound node.
    ///
    /// Keys outside this subtype's schema and values the field does not
    /// accept produce no patch.
    pub fn edit(
        &self,
        key: &str,
        value: FieldValue,
    ) -> Option<(NodeId, NodeConfig)> {
        let field = self
            .fields
            .iter()
            .find(|field| field.descriptor.key == key)?;
        if !field.descriptor.accepts(&value) {
            return None;
        }
        let mut patch = NodeConfig::new();
        patch.insert(key.to_owned(), value.to_json()?);
        Some((self.node_id.clone(), patch))
    }
}

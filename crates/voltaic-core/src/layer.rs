use serde::{Deserialize, Serialize};

/// A unique layer identifier. Negative ids are reserved for non-board layers
/// (schematic sheets use 0).
pub type LayerId = i32;

/// A drawing layer of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub color: LayerColor,
    pub visible: bool,
    pub selectable: bool,
}

impl Layer {
    pub fn new(id: LayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color: LayerColor::default(),
            visible: true,
            selectable: true,
        }
    }

    pub fn with_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = LayerColor { r, g, b };
        self
    }
}

/// RGB color for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for LayerColor {
    fn default() -> Self {
        Self {
            r: 128,
            g: 128,
            b: 128,
        }
    }
}

/// The ordered set of layers plus the current work layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
    pub work_layer: LayerId,
}

impl LayerStack {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            work_layer: 0,
        }
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn get_layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// A layer is pickable when it is both visible and selectable. Unknown
    /// layers are treated as pickable so a document referencing a layer the
    /// stack does not describe stays editable.
    pub fn is_pickable(&self, id: LayerId) -> bool {
        self.get_layer(id)
            .map(|l| l.visible && l.selectable)
            .unwrap_or(true)
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }

    pub fn all_layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn toggle_visibility(&mut self, id: LayerId) {
        if let Some(layer) = self.get_layer_mut(id) {
            layer.visible = !layer.visible;
        }
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickable() {
        let mut stack = LayerStack::new();
        stack.add_layer(Layer::new(0, "top"));
        stack.add_layer(Layer::new(1, "bottom"));
        assert!(stack.is_pickable(0));
        stack.get_layer_mut(1).unwrap().selectable = false;
        assert!(!stack.is_pickable(1));
        stack.toggle_visibility(0);
        assert!(!stack.is_pickable(0));
        // Unknown layers stay pickable.
        assert!(stack.is_pickable(42));
    }
}

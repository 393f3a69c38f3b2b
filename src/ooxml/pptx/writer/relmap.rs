/// Relationship ID mapper for tracking relationships during presentation generation.
///
/// Relationships are created first and their IDs handed to XML generation, so
/// every `r:embed` in a slide refers to an entry of that slide's `.rels` part.
use std::collections::HashMap;

/// Maps slide pictures to their relationship IDs.
///
/// The mapper is organized per-slide, as each slide has its own set of relationships.
#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// Maps (slide_index, image_index_in_slide) to relationship ID
    image_ids: HashMap<(usize, usize), String>,
}

impl RelationshipMapper {
    /// Create a new empty relationship mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image relationship mapping for a specific slide.
    ///
    /// # Arguments
    /// * `slide_index` - The index of the slide (0-based)
    /// * `image_index_in_slide` - The index of the image within that slide (0-based, z-order)
    /// * `rel_id` - The relationship ID (e.g., "rId2")
    pub fn add_image(&mut self, slide_index: usize, image_index_in_slide: usize, rel_id: String) {
        self.image_ids
            .insert((slide_index, image_index_in_slide), rel_id);
    }

    /// Get the relationship ID for an image in a specific slide.
    pub fn get_image_id(&self, slide_index: usize, image_index_in_slide: usize) -> Option<&str> {
        self.image_ids
            .get(&(slide_index, image_index_in_slide))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ids_are_per_slide() {
        let mut map = RelationshipMapper::new();
        map.add_image(0, 0, "rId2".to_string());
        map.add_image(1, 0, "rId3".to_string());
        assert_eq!(map.get_image_id(0, 0), Some("rId2"));
        assert_eq!(map.get_image_id(1, 0), Some("rId3"));
        assert_eq!(map.get_image_id(0, 1), None);
    }
}

use crate::shape::shape_bounds;
use tags::font::{GlyphEntry, ZoneData, ZoneRecord};
use tags::RectExt;

/// Produces the alignment zones ("FlashType" hints) for a glyph.
pub trait ZoneRecordBuilder {
    fn build(&self, glyph: &GlyphEntry) -> ZoneRecord;
}

/// Derives one horizontal and one vertical zone from the extent of the
/// glyph outline, in glyph units.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineZoneRecordBuilder;

impl ZoneRecordBuilder for OutlineZoneRecordBuilder {
    fn build(&self, glyph: &GlyphEntry) -> ZoneRecord {
        let bounds = shape_bounds(&glyph.records, &[]);
        ZoneRecord {
            x: ZoneData {
                coordinate: bounds.x_min.get() as f32,
                range: bounds.width() as f32,
            },
            y: ZoneData {
                coordinate: bounds.y_min.get() as f32,
                range: bounds.height() as f32,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tags::shape::{move_to, straight};

    #[test]
    fn zones_follow_the_outline() {
        let records = vec![
            move_to(100, -700),
            straight(400, 0),
            straight(0, 700),
            straight(-400, -700),
        ];
        let record = OutlineZoneRecordBuilder.build(&GlyphEntry::new('L' as u16, records, 560));
        assert_eq!(
            record,
            ZoneRecord {
                x: ZoneData {
                    coordinate: 100.0,
                    range: 400.0
                },
                y: ZoneData {
                    coordinate: -700.0,
                    range: 700.0
                },
            }
        );
    }

    #[test]
    fn blank_glyphs_get_empty_zones() {
        let record = OutlineZoneRecordBuilder.build(&GlyphEntry::new(32, Vec::new(), 250));
        assert_eq!(record, ZoneRecord::default());
    }
}

//! Repeat-group filtering of labels that survived collision

use crate::resolver::LabelRef;
use crate::tile::Tile;
use glam::Vec2;
use std::collections::BTreeMap;

/// Slack on the repeat distance in screen units: members exactly one repeat
/// distance apart both stay
const DISTANCE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
struct Member {
    label: LabelRef,
    center: Vec2,
    visible: bool,
}

/// Group buckets reused across frames
#[derive(Debug, Default)]
pub(crate) struct RepeatGroups {
    groups: BTreeMap<u64, Vec<Member>>,
    candidates: Vec<(f32, LabelRef)>,
}

impl RepeatGroups {
    /// Occlude labels crowding another member of their repeat group
    ///
    /// Labels are visited by ascending squared distance of their model anchor
    /// from the tile origin, so the outcome does not depend on the order tiles
    /// were collected in. Returns the number of labels occluded.
    pub(crate) fn filter(&mut self, tiles: &mut [Tile], working: &[LabelRef]) -> usize {
        #[cfg(feature = "profiling")]
        profiling::scope!("labels::repeat_groups");

        for members in self.groups.values_mut() {
            members.clear();
        }
        self.candidates.clear();
        let mut dropped = 0;

        for &r in working {
            let label = r.get(tiles);
            let options = label.options();
            if label.is_occluded()
                || !label.is_text()
                || options.repeat_group == 0
                || options.repeat_distance <= 0.0
            {
                continue;
            }
            let key = label.transform().model_position1.length_squared();
            self.candidates.push((key, r));
        }

        let snapshot: &[Tile] = tiles;
        self.candidates.sort_by(|(ka, ra), (kb, rb)| {
            ka.total_cmp(kb)
                .then_with(|| ra.get(snapshot).id().cmp(&rb.get(snapshot).id()))
        });

        for &(_, r) in &self.candidates {
            let label = r.get(tiles);
            let options = label.options();
            let reach = (options.repeat_distance - DISTANCE_EPSILON).max(0.0);
            let threshold2 = reach * reach;
            let candidate = Member {
                label: r,
                center: label.center(),
                visible: label.visible_state(),
            };

            let members = self.groups.entry(options.repeat_group).or_default();

            // Same anchor seen through two overlapping tiles
            if members.iter().any(|m| m.center == candidate.center) {
                continue;
            }

            match members
                .iter_mut()
                .find(|m| m.center.distance_squared(candidate.center) < threshold2)
            {
                Some(member) => {
                    dropped += 1;
                    if candidate.visible && !member.visible {
                        member.label.get_mut(tiles).occlude();
                        *member = candidate;
                    } else {
                        r.get_mut(tiles).occlude();
                    }
                }
                None => members.push(candidate),
            }
        }

        self.groups.retain(|_, members| !members.is_empty());
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::screen_projection;
    use crate::label::{Label, LabelKind, LabelOptions};
    use crate::label_set::{SpriteLabels, StyleMesh, TextLabels};
    use crate::tile::{StyleId, TileId};
    use glam::Mat4;

    const SCREEN: Vec2 = Vec2::new(1000.0, 1000.0);

    fn options(group: u64, distance: f32) -> LabelOptions {
        LabelOptions {
            repeat_group: group,
            repeat_distance: distance,
            ..Default::default()
        }
    }

    fn tile(labels: Vec<Label>) -> (Vec<Tile>, Vec<LabelRef>) {
        let mut set = TextLabels::new();
        for label in labels {
            set.push_label(label).unwrap();
        }
        let mut tile =
            Tile::new(TileId::new(0, 0, 0), 0, Mat4::IDENTITY).with_mesh(StyleId(0), StyleMesh::Text(set));
        let mvp = screen_projection(SCREEN.x, SCREEN.y);
        let mut refs = Vec::new();
        for (i, label) in tile.meshes_mut()[0].1.labels_mut().iter_mut().enumerate() {
            label.update(&mvp, SCREEN, 0.0);
            refs.push(LabelRef {
                tile: 0,
                mesh: 0,
                label: i,
            });
        }
        (vec![tile], refs)
    }

    fn text(x: f32, y: f32, options: LabelOptions) -> Label {
        Label::text(LabelKind::Point, Vec2::new(x, y), Vec2::new(10.0, 10.0)).with_options(options)
    }

    fn occluded(tiles: &[Tile]) -> Vec<bool> {
        tiles[0].meshes()[0].1.labels().iter().map(|l| l.is_occluded()).collect()
    }

    #[test]
    fn test_close_members_keep_one() {
        let (mut tiles, refs) = tile(vec![
            text(100.0, 100.0, options(7, 100.0)),
            text(150.0, 100.0, options(7, 100.0)),
        ]);
        assert_eq!(RepeatGroups::default().filter(&mut tiles, &refs), 1);
        // Closer to the origin wins
        assert_eq!(occluded(&tiles), vec![false, true]);
    }

    #[test]
    fn test_distance_at_threshold_keeps_both() {
        let (mut tiles, refs) = tile(vec![
            text(100.0, 100.0, options(7, 100.0)),
            text(200.0, 100.0, options(7, 100.0)),
        ]);
        assert_eq!(RepeatGroups::default().filter(&mut tiles, &refs), 0);
        assert_eq!(occluded(&tiles), vec![false, false]);
    }

    #[test]
    fn test_distance_just_below_threshold_keeps_one() {
        let (mut tiles, refs) = tile(vec![
            text(100.0, 100.0, options(7, 100.0)),
            text(199.9, 100.0, options(7, 100.0)),
        ]);
        assert_eq!(RepeatGroups::default().filter(&mut tiles, &refs), 1);
        assert_eq!(occluded(&tiles), vec![false, true]);
    }

    #[test]
    fn test_distance_at_threshold_far_from_origin() {
        let (mut tiles, refs) = tile(vec![
            text(903.0, 517.0, options(3, 37.0)),
            text(903.0, 554.0, options(3, 37.0)),
        ]);
        assert_eq!(RepeatGroups::default().filter(&mut tiles, &refs), 0);
    }

    #[test]
    fn test_group_zero_and_distance_zero_are_exempt() {
        let (mut tiles, refs) = tile(vec![
            text(100.0, 100.0, options(0, 100.0)),
            text(110.0, 100.0, options(0, 100.0)),
            text(100.0, 300.0, options(3, 0.0)),
            text(110.0, 300.0, options(3, 0.0)),
        ]);
        RepeatGroups::default().filter(&mut tiles, &refs);
        assert!(occluded(&tiles).iter().all(|o| !o));
    }

    #[test]
    fn test_different_groups_do_not_interact() {
        let (mut tiles, refs) = tile(vec![
            text(100.0, 100.0, options(1, 100.0)),
            text(120.0, 100.0, options(2, 100.0)),
        ]);
        RepeatGroups::default().filter(&mut tiles, &refs);
        assert_eq!(occluded(&tiles), vec![false, false]);
    }

    #[test]
    fn test_identical_position_is_a_duplicate() {
        let (mut tiles, refs) = tile(vec![
            text(100.0, 100.0, options(7, 100.0)),
            text(100.0, 100.0, options(7, 100.0)),
        ]);
        RepeatGroups::default().filter(&mut tiles, &refs);
        assert_eq!(occluded(&tiles), vec![false, false]);
    }

    #[test]
    fn test_visible_member_is_kept() {
        let (mut tiles, refs) = tile(vec![
            text(100.0, 100.0, options(7, 100.0)),
            text(150.0, 100.0, options(7, 100.0)),
        ]);
        refs[1].get_mut(&mut tiles).skip_transitions();
        RepeatGroups::default().filter(&mut tiles, &refs);
        assert_eq!(occluded(&tiles), vec![true, false]);
    }

    #[test]
    fn test_order_independent() {
        let labels = || {
            vec![
                text(300.0, 100.0, options(7, 100.0)),
                text(250.0, 100.0, options(7, 100.0)),
                text(200.0, 100.0, options(7, 100.0)),
            ]
        };
        let (mut tiles, refs) = tile(labels());
        RepeatGroups::default().filter(&mut tiles, &refs);
        let forward = occluded(&tiles);

        let (mut tiles, mut refs) = tile(labels());
        refs.reverse();
        RepeatGroups::default().filter(&mut tiles, &refs);
        assert_eq!(occluded(&tiles), forward);
        assert_eq!(forward, vec![false, true, false]);
    }

    #[test]
    fn test_sprites_are_ignored() {
        let mut set = SpriteLabels::new();
        for x in [100.0, 110.0] {
            set.push_label(
                Label::sprite(Vec2::new(x, 100.0), Vec2::new(8.0, 8.0), 0.0)
                    .with_options(options(7, 100.0)),
            )
            .unwrap();
        }
        let mut tiles = vec![
            Tile::new(TileId::new(0, 0, 0), 0, Mat4::IDENTITY)
                .with_mesh(StyleId(0), StyleMesh::Point(set)),
        ];
        let mvp = screen_projection(SCREEN.x, SCREEN.y);
        for label in tiles[0].meshes_mut()[0].1.labels_mut() {
            label.update(&mvp, SCREEN, 0.0);
        }
        let refs = [0, 1].map(|label| LabelRef {
            tile: 0,
            mesh: 0,
            label,
        });
        RepeatGroups::default().filter(&mut tiles, &refs);
        assert!(occluded(&tiles).iter().all(|o| !o));
    }
}

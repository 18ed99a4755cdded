use super::*;

// ============================================================================
// Helpers
// ============================================================================

fn brute_force(mask: &[bool], width: i32, start: IVec2, end: IVec2) -> u32 {
    let mut count = 0;
    for y in start.y..=end.y {
        for x in start.x..=end.x {
            if mask[(x + y * width) as usize] {
                count += 1;
            }
        }
    }
    count
}

fn pseudo_random_mask(width: i32, height: i32) -> Vec<bool> {
    let mut state = 0x2545_F491u32;
    (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state % 3 == 0
        })
        .collect()
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn test_all_covered_table_counts_area() {
    let size = IVec2::new(3, 2);
    let mut table = vec![0u32; 6];
    build_sat(&mut table, size, |_| true);
    assert_eq!(table, vec![1, 2, 3, 2, 4, 6]);
}

#[test]
fn test_single_row_and_column() {
    let mut row = vec![0u32; 4];
    build_sat(&mut row, IVec2::new(4, 1), |c| c.x % 2 == 0);
    assert_eq!(row, vec![1, 1, 2, 2]);

    let mut column = vec![0u32; 3];
    build_sat(&mut column, IVec2::new(1, 3), |c| c.y != 1);
    assert_eq!(column, vec![1, 1, 2]);
}

#[test]
fn test_oversized_table_tail_untouched() {
    let mut table = vec![9u32; 8];
    build_sat(&mut table, IVec2::new(2, 2), |_| false);
    assert_eq!(&table[..4], &[0, 0, 0, 0]);
    assert_eq!(&table[4..], &[9, 9, 9, 9]);
}

// ============================================================================
// Query
// ============================================================================

#[test]
fn test_query_matches_brute_force_everywhere() {
    let (width, height) = (7, 5);
    let mask = pseudo_random_mask(width, height);
    let mut table = vec![0u32; (width * height) as usize];
    build_sat(&mut table, IVec2::new(width, height), |c| mask[(c.x + c.y * width) as usize]);

    for sy in 0..height {
        for sx in 0..width {
            for ey in sy..height {
                for ex in sx..width {
                    let start = IVec2::new(sx, sy);
                    let end = IVec2::new(ex, ey);
                    assert_eq!(
                        query_sat(&table, width, start, end),
                        brute_force(&mask, width, start, end),
                        "rect {}..{}", start, end
                    );
                }
            }
        }
    }
}

#[test]
fn test_query_single_texel() {
    let mut table = vec![0u32; 4];
    build_sat(&mut table, IVec2::new(2, 2), |c| c == IVec2::new(1, 1));
    assert_eq!(query_sat(&table, 2, IVec2::new(1, 1), IVec2::new(1, 1)), 1);
    assert_eq!(query_sat(&table, 2, IVec2::new(0, 0), IVec2::new(0, 1)), 0);
}

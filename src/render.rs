use crate::packer::PackPlacement;
use crate::types::{PalletKind, Trailer};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

fn initial(kind: PalletKind) -> char {
    match kind {
        PalletKind::Euro => 'E',
        PalletKind::Industrie => 'I',
        PalletKind::Blumenwagen => 'B',
        PalletKind::Ibc => 'C',
        PalletKind::Custom => 'X',
    }
}

/// Top-down ASCII view of the bed, front at the left edge.
pub fn render_bed(trailer: Trailer, placements: &[PackPlacement]) -> String {
    let scale = f64::min(
        MAX_WIDTH / trailer.length as f64,
        MAX_HEIGHT / trailer.width as f64,
    );
    let grid_w = (trailer.length as f64 * scale).round() as usize;
    let grid_h = (trailer.width as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    // Bed outline first, pallets on top.
    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in placements {
        let sx = (p.x as f64 * scale).round() as usize;
        let sy = (p.y as f64 * scale).round() as usize;
        let sw = (p.w as f64 * scale).round() as usize;
        let sh = (p.h as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        if sw > 2 && sh > 1 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            if cx > sx && cx < sx + sw && cy > sy && cy < sy + sh {
                grid[cy][cx] = initial(p.kind);
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let x2 = (x + w).min(grid[0].len() - 1);
    let y2 = (y + h).min(grid.len() - 1);

    for gx in x..=x2 {
        grid[y][gx] = if grid[y][gx] == '|' { '+' } else { '-' };
        grid[y2][gx] = if grid[y2][gx] == '|' { '+' } else { '-' };
    }
    for row in grid.iter_mut().take(y2 + 1).skip(y) {
        row[x] = if row[x] == '-' { '+' } else { '|' };
        row[x2] = if row[x2] == '-' { '+' } else { '|' };
    }
    grid[y][x] = '+';
    grid[y][x2] = '+';
    grid[y2][x] = '+';
    grid[y2][x2] = '+';
}

/// Clipped rectangle to blend, in full-resolution pixels.
///
/// `src_*` is where reading starts inside the source frame, `dst_*` where writing starts
/// inside the output frame. Both rectangles are guaranteed to lie inside their frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendRect {
    pub src_x: u32,
    pub src_y: u32,
    pub dst_x: u32,
    pub dst_y: u32,
    pub width: u32,
    pub height: u32,
}

/// Round `pos` down to a multiple of `align` (floor, also for negative values).
pub fn align_down(pos: i64, align: i32) -> i64 {
    let align = i64::from(align.max(1));
    pos.div_euclid(align) * align
}

#[derive(Clone, Copy, Debug)]
struct Span {
    src: i64,
    dst: i64,
    len: i64,
}

fn clip_axis(pos: i64, src_len: i64, dst_len: i64) -> Option<Span> {
    let offset = if pos < 0 { -pos } else { 0 };
    if offset >= src_len {
        return None;
    }
    let start = pos.max(0);
    let len = (src_len - offset).min(dst_len - start);
    if len <= 0 {
        return None;
    }
    Some(Span {
        src: offset,
        dst: start,
        len,
    })
}

/// Place a `src_w`x`src_h` source at (`xpos`, `ypos`) on a `dst_w`x`dst_h` canvas.
///
/// Positions are first rounded down to the format alignment. Returns `None` when nothing of
/// the source is visible.
pub fn clip_placement(
    xpos: i32,
    ypos: i32,
    (src_w, src_h): (u32, u32),
    (dst_w, dst_h): (u32, u32),
    (x_align, y_align): (i32, i32),
) -> Option<BlendRect> {
    let x = clip_axis(
        align_down(i64::from(xpos), x_align),
        i64::from(src_w),
        i64::from(dst_w),
    )?;
    let y = clip_axis(
        align_down(i64::from(ypos), y_align),
        i64::from(src_h),
        i64::from(dst_h),
    )?;
    // Every value below is bounded by a u32 frame dimension.
    Some(BlendRect {
        src_x: x.src as u32,
        src_y: y.src as u32,
        dst_x: x.dst as u32,
        dst_y: y.dst as u32,
        width: x.len as u32,
        height: y.len as u32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/clip.rs"]
mod tests;

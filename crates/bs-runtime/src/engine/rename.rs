use bs_core::Sprite;

/// Rewrites every scene start and scene transition target equal to
/// `old_name`. Returns the number of bricks changed.
pub fn propagate_scene_rename(sprites: &mut [Sprite], old_name: &str, new_name: &str) -> usize {
    let mut rewritten = 0;
    for sprite in sprites.iter_mut() {
        for brick in sprite.all_bricks_mut() {
            if let Some((_, scene)) = brick.scene_ref_mut() {
                if scene.as_str() == old_name {
                    *scene = new_name.to_string();
                    rewritten += 1;
                }
            }
        }
    }
    rewritten
}

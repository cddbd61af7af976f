use bs_core::Sprite;

/// Broadcast message names used by the sprites' scripts and user brick
/// definitions, in first discovery order. Empty names are skipped.
pub fn collect_broadcast_message_names(sprites: &[Sprite]) -> Vec<String> {
    let mut messages = Vec::new();
    for sprite in sprites {
        for script in &sprite.scripts {
            add_message(&mut messages, script.broadcast_message());
            for brick in &script.bricks {
                add_message(&mut messages, brick.broadcast_message());
            }
        }
        for user_brick in &sprite.user_bricks {
            for brick in &user_brick.definition.bricks {
                add_message(&mut messages, brick.broadcast_message());
            }
        }
    }
    messages
}

fn add_message(messages: &mut Vec<String>, message: Option<&str>) {
    let Some(message) = message else {
        return;
    };
    if !message.is_empty() && !messages.iter().any(|existing| existing == message) {
        messages.push(message.to_string());
    }
}

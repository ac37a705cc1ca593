//! Presentation feed (Update, variable rate).

use bevy::prelude::*;

use crate::components::AnimatorFeed;
use crate::navigation::NavigationAgent;

/// Система: speed параметр анимации = |desired velocity|
///
/// Только чтение навигации, состояние AI здесь не меняется.
pub fn feed_animator_speed(mut agents: Query<(&NavigationAgent, &mut AnimatorFeed)>) {
    for (nav, mut feed) in agents.iter_mut() {
        let speed = nav.desired_velocity.length();
        if feed.speed != speed {
            feed.speed = speed;
        }
    }
}

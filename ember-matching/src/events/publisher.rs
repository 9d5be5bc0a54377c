use ember_shared::clients::rabbitmq::RabbitMQClient;
use ember_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{Match, Swipe};

pub async fn publish_swipe_recorded(rabbitmq: &RabbitMQClient, swipe: &Swipe) {
    let event = Event::new(
        "ember-matching",
        routing_keys::MATCHING_SWIPE_RECORDED,
        payloads::SwipeRecorded {
            swiper_id: swipe.swiper_id,
            swiped_id: swipe.swiped_id,
            action: swipe.action.clone(),
            like_type: swipe.like_type.clone(),
        },
    )
    .with_user(swipe.swiper_id);

    if let Err(e) = rabbitmq.publish(routing_keys::MATCHING_SWIPE_RECORDED, &event).await {
        tracing::error!(error = %e, "failed to publish swipe.recorded event");
    }
}

pub async fn publish_match_created(rabbitmq: &RabbitMQClient, created: &Match) {
    let event = Event::new(
        "ember-matching",
        routing_keys::MATCHING_MATCH_CREATED,
        payloads::MatchCreated {
            match_id: created.id,
            user_a_id: created.user_a,
            user_b_id: created.user_b,
            is_mutual_emotion: created.is_mutual_emotion,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCHING_MATCH_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish match.created event");
    }
}

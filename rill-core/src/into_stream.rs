// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridge from a [`Publisher`] to a `futures::Stream`.
//!
//! [`IntoStream`] converts any publisher into a [`SignalStream`], a stream
//! of [`StreamItem`]s that maps demand onto polling: one element is
//! requested up front and one more after each delivered value, so the
//! publisher is never asked for more than the consumer is actually pulling.
//!
//! An in-band [`StreamItem::Error`] is followed by the end of the stream;
//! normal completion ends the stream without an error item. Dropping the
//! stream before a terminal signal cancels the subscription.

use crate::error::RillError;
use crate::publisher::{Publisher, Subscriber, Subscription};
use crate::stream_item::StreamItem;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

type SubscriptionSlot = Arc<Mutex<Option<Arc<dyn Subscription>>>>;

/// A trait for publishers that can be converted into a `Stream`.
///
/// Implemented for every sized [`Publisher`] whose item type is sendable,
/// so operator outputs and individual windows alike can be consumed with
/// `StreamExt` combinators.
pub trait IntoStream: Publisher + Sized {
    /// Converts this publisher into a stream of [`StreamItem`]s.
    fn into_stream(self) -> SignalStream<Self::Item>;
}

impl<P> IntoStream for P
where
    P: Publisher + Sized,
    P::Item: Send + 'static,
{
    fn into_stream(self) -> SignalStream<P::Item> {
        let (sender, receiver) = mpsc::unbounded();
        let subscription: SubscriptionSlot = Arc::new(Mutex::new(None));
        self.subscribe(Arc::new(BridgeSubscriber {
            sender,
            subscription: subscription.clone(),
        }));
        SignalStream {
            receiver,
            subscription,
            terminated: false,
        }
    }
}

struct BridgeSubscriber<T> {
    sender: UnboundedSender<StreamItem<T>>,
    subscription: SubscriptionSlot,
}

impl<T: Send + 'static> Subscriber<T> for BridgeSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.subscription.lock() = Some(subscription.clone());
        subscription.request(1);
    }

    fn on_next(&self, item: T) {
        if self.sender.unbounded_send(StreamItem::Value(item)).is_err() {
            // Consumer went away; release our interest.
            let subscription = self.subscription.lock().clone();
            if let Some(s) = subscription {
                s.cancel();
            }
        }
    }

    fn on_error(&self, error: RillError) {
        let _ = self.sender.unbounded_send(StreamItem::Error(error));
        self.sender.close_channel();
    }

    fn on_complete(&self) {
        self.sender.close_channel();
    }
}

/// Stream adapter returned by [`IntoStream::into_stream`].
pub struct SignalStream<T> {
    receiver: UnboundedReceiver<StreamItem<T>>,
    subscription: SubscriptionSlot,
    terminated: bool,
}

impl<T> Stream for SignalStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match Pin::new(&mut this.receiver).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                match &item {
                    StreamItem::Value(_) => {
                        // One consumed, one more requested: demand tracks the pull.
                        let subscription = this.subscription.lock().clone();
                        if let Some(s) = subscription {
                            s.request(1);
                        }
                    }
                    StreamItem::Error(_) => this.terminated = true,
                }
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                this.terminated = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for SignalStream<T> {
    fn drop(&mut self) {
        if !self.terminated {
            let subscription = self.subscription.lock().clone();
            if let Some(s) = subscription {
                s.cancel();
            }
        }
    }
}

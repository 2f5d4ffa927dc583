//! 线程安全的事件队列
//!
//! 多生产者单消费者的 FIFO 队列，基于 `Mutex` + `Condvar` 实现。生产者只在
//! 入队时短暂持锁；后台 worker 通过 [`EventQueue::wait_for_data`] 等待数据、
//! 超时或停止信号。关闭后的队列拒绝新的入队，保证最终排空时不会丢失任何
//! 已被接受的事件。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// 线程安全的 FIFO 队列
#[derive(Debug)]
pub struct EventQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 入队并唤醒一个等待者
    ///
    /// 队列已关闭时丢弃该值并返回 `false`。
    pub fn push(&self, value: T) -> bool {
        {
            let mut state = self.lock();
            if state.closed {
                return false;
            }
            state.items.push_back(value);
        }
        self.available.notify_one();
        true
    }

    /// 非阻塞出队
    pub fn pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// 在一次加锁内取出至多 `max` 个元素，追加到 `out`，返回取出数量
    pub fn pop_batch(&self, out: &mut Vec<T>, max: usize) -> usize {
        let mut state = self.lock();
        let count = max.min(state.items.len());
        out.extend(state.items.drain(..count));
        count
    }

    /// 取出全部元素，追加到 `out`
    pub fn drain_to(&self, out: &mut Vec<T>) -> usize {
        let mut state = self.lock();
        let count = state.items.len();
        out.extend(state.items.drain(..));
        count
    }

    /// 关闭队列并取出全部元素
    ///
    /// 关闭与排空在同一临界区内完成，此后的 `push` 全部失败。
    pub fn close_and_drain_to(&self, out: &mut Vec<T>) -> usize {
        let mut state = self.lock();
        state.closed = true;
        let count = state.items.len();
        out.extend(state.items.drain(..));
        count
    }

    /// 阻塞直到队列非空、超时或 `running` 变为 false
    ///
    /// 返回时队列是否非空。
    pub fn wait_for_data(&self, timeout: Duration, running: &AtomicBool) -> bool {
        let state = self.lock();
        let (state, _) = self
            .available
            .wait_timeout_while(state, timeout, |state| {
                state.items.is_empty() && running.load(Ordering::Acquire)
            })
            .unwrap_or_else(PoisonError::into_inner);
        !state.items.is_empty()
    }

    /// 唤醒所有等待者
    ///
    /// 先短暂获取锁，调用前对标志位的修改不会被等待者错过。
    pub fn notify_all(&self) {
        drop(self.lock());
        self.available.notify_all();
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_fifo_order() {
        let queue = EventQueue::new();
        for i in 0..5 {
            assert!(queue.push(i));
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.pop(), Some(0));

        let mut batch = Vec::new();
        assert_eq!(queue.pop_batch(&mut batch, 2), 2);
        assert_eq!(batch, vec![1, 2]);

        batch.clear();
        assert_eq!(queue.drain_to(&mut batch), 2);
        assert_eq!(batch, vec![3, 4]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_pop_batch_on_short_queue() {
        let queue = EventQueue::new();
        queue.push("a");
        let mut batch = Vec::new();
        assert_eq!(queue.pop_batch(&mut batch, 64), 1);
        assert_eq!(queue.pop_batch(&mut batch, 64), 0);
        assert_eq!(batch, vec!["a"]);
    }

    #[test]
    fn test_closed_queue_rejects_push() {
        let queue = EventQueue::new();
        queue.push(1);
        let mut out = Vec::new();
        assert_eq!(queue.close_and_drain_to(&mut out), 1);
        assert!(queue.is_closed());
        assert!(!queue.push(2));
        assert!(queue.is_empty());
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_wait_for_data_times_out_on_empty_queue() {
        let queue: EventQueue<u32> = EventQueue::new();
        let running = AtomicBool::new(true);
        let start = Instant::now();
        assert!(!queue.wait_for_data(Duration::from_millis(50), &running));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(45));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn test_wait_for_data_wakes_on_push() {
        let queue = Arc::new(EventQueue::new());
        let running = Arc::new(AtomicBool::new(true));

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.push(42u32);
            })
        };

        let start = Instant::now();
        assert!(queue.wait_for_data(Duration::from_secs(10), &running));
        assert!(start.elapsed() < Duration::from_secs(5));
        producer.join().unwrap();
        assert_eq!(queue.pop(), Some(42));
    }

    #[test]
    fn test_wait_for_data_returns_when_stopped() {
        let queue: Arc<EventQueue<u32>> = Arc::new(EventQueue::new());
        let running = Arc::new(AtomicBool::new(true));

        let waiter = {
            let queue = Arc::clone(&queue);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let start = Instant::now();
                queue.wait_for_data(Duration::from_secs(30), &running);
                start.elapsed()
            })
        };

        thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::Release);
        queue.notify_all();
        assert!(waiter.join().unwrap() < Duration::from_secs(10));
    }

    #[test]
    fn test_multi_producer_preserves_per_producer_order() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 1000;

        let queue = Arc::new(EventQueue::new());
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        queue.push((p, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut out = Vec::new();
        queue.drain_to(&mut out);
        assert_eq!(out.len(), PRODUCERS * PER_PRODUCER);

        let mut next: HashMap<usize, usize> = HashMap::new();
        for (p, i) in out {
            let expected = next.entry(p).or_insert(0);
            assert_eq!(i, *expected);
            *expected += 1;
        }
        assert!(next.values().all(|&n| n == PER_PRODUCER));
    }

    proptest! {
        #[test]
        fn prop_batches_preserve_sequence(
            items in proptest::collection::vec(any::<u32>(), 0..200),
            max in 1usize..16,
        ) {
            let queue = EventQueue::new();
            for item in &items {
                queue.push(*item);
            }
            let mut out = Vec::new();
            while queue.pop_batch(&mut out, max) > 0 {}
            prop_assert_eq!(out, items);
        }
    }
}

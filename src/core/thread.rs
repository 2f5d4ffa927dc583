//! 线程标签
//!
//! 每个线程可以设置一个可读标签，事件构造时随线程 ID 一起记录。
//! 未设置时回退到标准库线程名，再回退到 `Unknown`。

use std::cell::RefCell;

thread_local! {
    static THREAD_LABEL: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// 设置当前线程的标签
pub fn set_thread_label(label: impl Into<String>) {
    let label = label.into();
    THREAD_LABEL.with(|cell| *cell.borrow_mut() = Some(label));
}

/// 当前线程是否已经显式设置过标签
pub fn has_thread_label() -> bool {
    THREAD_LABEL.with(|cell| cell.borrow().is_some())
}

/// 获取当前线程的标签
pub fn thread_label() -> String {
    THREAD_LABEL.with(|cell| {
        if let Some(label) = cell.borrow().as_ref() {
            return label.clone();
        }
        std::thread::current()
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_label_defaults_to_thread_name() {
        let handle = thread::Builder::new()
            .name("worker-7".to_string())
            .spawn(|| (has_thread_label(), thread_label()))
            .unwrap();
        assert_eq!(handle.join().unwrap(), (false, "worker-7".to_string()));
    }

    #[test]
    fn test_unnamed_thread_is_unknown() {
        let label = thread::spawn(thread_label).join().unwrap();
        assert_eq!(label, "Unknown");
    }

    #[test]
    fn test_label_is_thread_local() {
        let handle = thread::spawn(|| {
            set_thread_label("Renderer");
            let inner = thread::spawn(has_thread_label).join().unwrap();
            (thread_label(), inner)
        });
        assert_eq!(handle.join().unwrap(), ("Renderer".to_string(), false));
    }
}

use std::collections::VecDeque;

/// Bounded history of player-facing messages, oldest first.
#[derive(Debug)]
pub(crate) struct MessageLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl MessageLog {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, line: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            let _ = self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub(crate) fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_lines_fall_off() {
        let mut log = MessageLog::new(2);
        log.push("one");
        log.push("two");
        log.push("three");
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["two", "three"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = MessageLog::new(0);
        log.push("ignored");
        assert_eq!(log.lines().count(), 0);
    }
}

use serde::Serialize;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Slice one page out of an already ordered result set.
    pub fn from_ordered(rows: Vec<T>, req: PageRequest) -> Self {
        let total_elements = rows.len() as u64;
        let total_pages = if req.size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(req.size))
        };
        let content = rows
            .into_iter()
            .skip(req.offset())
            .take(req.size as usize)
            .collect();
        Self {
            content,
            page: req.page,
            size: req.size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

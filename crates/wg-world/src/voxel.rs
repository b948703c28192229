//! Chunked voxel storage.
//!
//! # Data layout
//!
//! A world is a sparse map of 16×16 chunk columns keyed by `(cx, cz)`.  Each
//! column stores its blocks in one flat `Vec<BlockKind>`:
//!
//! ```text
//! index = ((y - min_y) * CHUNK_WIDTH + lz) * CHUNK_WIDTH + lx
//! ```
//!
//! A chunk that is absent from the map is *unloaded*: reads against it fail
//! with [`WorldError::ChunkNotLoaded`] rather than pretending it is air, so
//! callers can tell "nothing here" from "don't know".

use rustc_hash::FxHashMap;
use wg_core::{BlockPos, WorldId};

use crate::{BlockKind, WorldError, WorldResult};

/// Horizontal edge length of a chunk column.
pub const CHUNK_WIDTH: i32 = 16;

// ── BlockSource ───────────────────────────────────────────────────────────────

/// Read-only access to a world's blocks.
///
/// The probe and the landing resolver are written against this trait so that
/// tests (and alternative hosts) can supply their own block data.
pub trait BlockSource {
    /// Lowest buildable y (inclusive).
    fn min_y(&self) -> i32;

    /// Build height (exclusive).
    fn max_y(&self) -> i32;

    /// The block at `pos`.
    ///
    /// # Errors
    ///
    /// [`WorldError::OutOfBounds`] outside `[min_y, max_y)`,
    /// [`WorldError::ChunkNotLoaded`] if the containing chunk is unloaded.
    fn block_at(&self, pos: BlockPos) -> WorldResult<BlockKind>;
}

// ── Chunk ─────────────────────────────────────────────────────────────────────

struct Chunk {
    blocks: Vec<BlockKind>,
}

impl Chunk {
    fn empty(height: usize) -> Self {
        let len = height * (CHUNK_WIDTH * CHUNK_WIDTH) as usize;
        Self { blocks: vec![BlockKind::Air; len] }
    }
}

// ── VoxelWorld ────────────────────────────────────────────────────────────────

/// One world: a name, a vertical range, and its loaded chunks.
pub struct VoxelWorld {
    pub id:   WorldId,
    pub name: String,
    min_y:    i32,
    max_y:    i32,
    chunks:   FxHashMap<(i32, i32), Chunk>,
}

impl VoxelWorld {
    /// Create an empty world spanning `min_y .. max_y`.  No chunks are loaded.
    pub fn new(id: WorldId, name: impl Into<String>, min_y: i32, max_y: i32) -> Self {
        debug_assert!(max_y > min_y, "world must have positive height");
        Self {
            id,
            name: name.into(),
            min_y,
            max_y,
            chunks: FxHashMap::default(),
        }
    }

    #[inline]
    fn height(&self) -> usize {
        (self.max_y - self.min_y) as usize
    }

    #[inline]
    fn chunk_key(pos: BlockPos) -> (i32, i32) {
        (pos.x.div_euclid(CHUNK_WIDTH), pos.z.div_euclid(CHUNK_WIDTH))
    }

    #[inline]
    fn local_index(&self, pos: BlockPos) -> usize {
        let lx = pos.x.rem_euclid(CHUNK_WIDTH) as usize;
        let lz = pos.z.rem_euclid(CHUNK_WIDTH) as usize;
        let ly = (pos.y - self.min_y) as usize;
        let w = CHUNK_WIDTH as usize;
        (ly * w + lz) * w + lx
    }

    fn check_height(&self, y: i32) -> WorldResult<()> {
        if y < self.min_y || y >= self.max_y {
            return Err(WorldError::OutOfBounds { world: self.id, y });
        }
        Ok(())
    }

    // ── Chunk lifecycle ───────────────────────────────────────────────────

    /// Load (create, all air) the chunk column `(cx, cz)` if absent.
    pub fn load_chunk(&mut self, cx: i32, cz: i32) {
        let height = self.height();
        self.chunks.entry((cx, cz)).or_insert_with(|| Chunk::empty(height));
    }

    /// Drop the chunk column `(cx, cz)`.  Its blocks are lost.
    pub fn unload_chunk(&mut self, cx: i32, cz: i32) -> bool {
        self.chunks.remove(&(cx, cz)).is_some()
    }

    pub fn is_chunk_loaded(&self, cx: i32, cz: i32) -> bool {
        self.chunks.contains_key(&(cx, cz))
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    // ── Block writes ──────────────────────────────────────────────────────

    /// Set one block, loading its chunk if needed.
    pub fn set_block(&mut self, pos: BlockPos, kind: BlockKind) -> WorldResult<()> {
        self.check_height(pos.y)?;
        let (cx, cz) = Self::chunk_key(pos);
        self.load_chunk(cx, cz);
        let idx = self.local_index(pos);
        if let Some(chunk) = self.chunks.get_mut(&(cx, cz)) {
            chunk.blocks[idx] = kind;
        }
        Ok(())
    }

    /// Fill the inclusive box spanned by `a` and `b` with `kind`.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, kind: BlockKind) -> WorldResult<()> {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        let (z0, z1) = (a.z.min(b.z), a.z.max(b.z));
        for y in y0..=y1 {
            for z in z0..=z1 {
                for x in x0..=x1 {
                    self.set_block(BlockPos::new(x, y, z), kind)?;
                }
            }
        }
        Ok(())
    }
}

impl BlockSource for VoxelWorld {
    #[inline]
    fn min_y(&self) -> i32 {
        self.min_y
    }

    #[inline]
    fn max_y(&self) -> i32 {
        self.max_y
    }

    fn block_at(&self, pos: BlockPos) -> WorldResult<BlockKind> {
        self.check_height(pos.y)?;
        let (cx, cz) = Self::chunk_key(pos);
        let chunk = self
            .chunks
            .get(&(cx, cz))
            .ok_or(WorldError::ChunkNotLoaded { world: self.id, cx, cz })?;
        Ok(chunk.blocks[self.local_index(pos)])
    }
}

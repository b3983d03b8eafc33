use kvfs_core::{KvFilesystem, MemKvStore, RequestContext};

/// A mounted, empty filesystem plus the context it was mounted under.
pub struct Fixture {
    pub fs: KvFilesystem<MemKvStore>,
    pub ctx: RequestContext,
}

impl Fixture {
    pub fn new() -> Self {
        let ctx = RequestContext::new(1000, 1000);
        let fs = KvFilesystem::mount(MemKvStore::open_with_create(), ctx.uid, ctx.gid)
            .expect("mount on a fresh store");
        Self { fs, ctx }
    }
}

/// A second, distinct caller identity, for ownership/permission tests.
pub fn other_ctx() -> RequestContext {
    RequestContext::new(2000, 2000)
}
